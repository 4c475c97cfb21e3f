// =============================================================================
// Relative Strength Index (RSI): simple rolling averages
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1: delta_t = close_t - close_{t-1} (no delta for the first close).
// Step 2: gain_t = max(delta_t, 0), loss_t = max(-delta_t, 0).
// Step 3: avg_gain / avg_loss = plain mean of the trailing `period` gains /
//          losses. Defined from index `period` onwards.
// Step 4: RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Zero-loss windows:
//   avg_loss == 0, avg_gain > 0  => 100 (only gains)
//   avg_loss == 0, avg_gain == 0 => undefined: a flat window carries no signal.
//
// Thresholds:  RSI >= 70 => OVERBOUGHT,  RSI <= 30 => OVERSOLD.
// =============================================================================

use serde::Serialize;

pub const OVERBOUGHT: f64 = 70.0;
pub const OVERSOLD: f64 = 30.0;

/// Compute the RSI series for `closes`, index-aligned with the input.
///
/// The first `period` entries are `None` (the window needs `period` deltas).
///
/// # Edge cases
/// - Empty input => empty vec
/// - `period == 0` => every entry `None`
/// - Flat window (no gains, no losses) => `None`
/// - A window touching a non-finite close => `None`
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return result;
    }

    // deltas[k] is the change into closes[k + 1].
    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let period_f = period as f64;

    for (offset, win) in deltas.windows(period).enumerate() {
        if win.iter().any(|d| !d.is_finite()) {
            continue;
        }

        let (sum_gain, sum_loss) = win.iter().fold((0.0_f64, 0.0_f64), |(g, l), &d| {
            if d > 0.0 {
                (g + d, l)
            } else if d < 0.0 {
                (g, l - d)
            } else {
                (g, l)
            }
        });

        result[offset + period] = rsi_from_averages(sum_gain / period_f, sum_loss / period_f);
    }

    result
}

/// Qualitative zone of an RSI reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

/// Classify a single RSI reading against the 70 / 30 guide lines.
pub fn rsi_zone(value: f64) -> RsiZone {
    if value >= OVERBOUGHT {
        RsiZone::Overbought
    } else if value <= OVERSOLD {
        RsiZone::Oversold
    } else {
        RsiZone::Neutral
    }
}

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 && avg_gain == 0.0 {
        return None;
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    rsi.is_finite().then_some(rsi)
}
