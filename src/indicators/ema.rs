// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   alpha  = 2 / (span + 1)
//   EMA_0  = value_0
//   EMA_t  = value_t * alpha + EMA_{t-1} * (1 - alpha)
//
// The series is seeded with the first observation rather than an SMA, so every
// index has a value. Early values carry little history and are noisy.
// =============================================================================

/// Compute the EMA series for `values` with the given `span`.
///
/// The output has exactly one entry per input value.
///
/// # Edge cases
/// - Empty input => empty vec
/// - `span == 0` => empty vec (no meaningful smoothing factor)
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    if span == 0 {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);

    let mut result = Vec::with_capacity(values.len());
    result.push(first);

    let mut prev = first;
    for &value in &values[1..] {
        let ema = value * alpha + prev * (1.0 - alpha);
        result.push(ema);
        prev = ema;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_span_zero() {
        assert!(calculate_ema(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn ema_seeded_with_first_value() {
        let ema = calculate_ema(&[42.0], 12);
        assert_eq!(ema, vec![42.0]);
    }

    #[test]
    fn ema_known_values() {
        // span 5 => alpha = 1/3
        let values: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let ema = calculate_ema(&values, 5);
        assert_eq!(ema.len(), values.len());

        let alpha = 2.0 / 6.0;
        let mut expected = values[0];
        assert!((ema[0] - expected).abs() < 1e-12);
        for (i, &v) in values.iter().enumerate().skip(1) {
            expected = v * alpha + expected * (1.0 - alpha);
            assert!((ema[i] - expected).abs() < 1e-12, "index {i}: got {}, expected {expected}", ema[i]);
        }
    }

    #[test]
    fn ema_of_constant_is_constant() {
        let ema = calculate_ema(&[100.0; 40], 26);
        assert!(ema.iter().all(|&v| (v - 100.0).abs() < 1e-12));
    }

    #[test]
    fn ema_lags_behind_rising_series() {
        let values: Vec<f64> = (1..=50).map(|x| x as f64).collect();
        let ema = calculate_ema(&values, 10);
        for (e, v) in ema.iter().zip(values.iter()).skip(1) {
            assert!(e < v);
        }
    }
}
