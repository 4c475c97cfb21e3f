// =============================================================================
// MACD / Signal Line
// =============================================================================
//
//   MACD_t   = EMA(close, fast)_t - EMA(close, slow)_t
//   Signal_t = EMA(MACD, signal)_t
//
// Both EMAs are seeded with the first close, so MACD_0 is exactly zero and both
// lines are defined from the very first bar.
// =============================================================================

use serde::Serialize;

use super::ema::calculate_ema;

/// MACD line and its signal line, index-aligned with the input closes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

/// Compute MACD and signal line.
///
/// Returns empty series for empty input or when any span is zero.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_ema = calculate_ema(closes, fast);
    let slow_ema = calculate_ema(closes, slow);
    if fast_ema.len() != closes.len() || slow_ema.len() != closes.len() {
        return MacdSeries::default();
    }

    let macd: Vec<f64> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .map(|(f, s)| f - s)
        .collect();

    let signal_line = calculate_ema(&macd, signal);
    if signal_line.len() != macd.len() {
        return MacdSeries::default();
    }

    MacdSeries {
        macd,
        signal: signal_line,
    }
}
