// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
//   SMA_t = mean(close_{t-w+1} .. close_t)
//
// The output is index-aligned with the input. The first `w - 1` positions have
// no reading and are `None`, which keeps them distinct from a genuine 0.0.
// =============================================================================

/// Compute the SMA series for `values` over a trailing `window`.
///
/// # Edge cases
/// - Empty input => empty vec
/// - `window == 0` => every entry `None`
/// - A window containing a non-finite value yields `None` at that position.
pub fn calculate_sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return result;
    }

    let w = window as f64;
    for (offset, win) in values.windows(window).enumerate() {
        let mean = win.iter().sum::<f64>() / w;
        if mean.is_finite() {
            result[offset + window - 1] = Some(mean);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(from: u32, to: u32) -> Vec<f64> {
        (from..=to).map(|x| x as f64).collect()
    }

    #[test]
    fn sma_empty_input() {
        assert!(calculate_sma(&[], 20).is_empty());
    }

    #[test]
    fn sma_window_zero() {
        assert_eq!(calculate_sma(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn sma_shorter_than_window_is_all_undefined() {
        let out = calculate_sma(&ramp(1, 10), 20);
        assert_eq!(out.len(), 10);
        assert!(out.iter().all(Option::is_none));
    }

    #[test]
    fn sma_20_on_21_points() {
        let closes = ramp(10, 30);
        let out = calculate_sma(&closes, 20);
        assert_eq!(out.len(), 21);
        assert!(out[..19].iter().all(Option::is_none));
        // mean(10..=29) and mean(11..=30)
        assert!((out[19].unwrap() - 19.5).abs() < 1e-12);
        assert!((out[20].unwrap() - 20.5).abs() < 1e-12);
    }

    #[test]
    fn sma_first_defined_value_is_plain_mean() {
        let closes = vec![3.0, 5.0, 7.0, 9.0];
        let out = calculate_sma(&closes, 3);
        assert_eq!(out[0], None);
        assert_eq!(out[1], None);
        assert!((out[2].unwrap() - 5.0).abs() < 1e-12);
        assert!((out[3].unwrap() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn sma_nan_window_is_undefined() {
        let closes = vec![1.0, f64::NAN, 3.0, 4.0, 5.0];
        let out = calculate_sma(&closes, 2);
        assert_eq!(out[1], None);
        assert_eq!(out[2], None);
        assert!((out[3].unwrap() - 3.5).abs() < 1e-12);
    }
}
