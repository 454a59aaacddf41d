// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Plain rolling mean over a fixed window.  The first `window - 1` positions
// have no value (absent, not zero); the caller aligns the output accordingly.

/// Compute the rolling mean of `values` over `window`.
///
/// Returns one value per input element starting at index `window - 1`, so the
/// output length is `values.len() - window + 1`.
///
/// # Edge cases
/// - `window == 0` => empty vec
/// - `values.len() < window` => empty vec
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.len() < window {
        return Vec::new();
    }

    let window_f = window as f64;
    let mut result = Vec::with_capacity(values.len() - window + 1);

    // Incremental sliding sum instead of re-summing each window.
    let mut sum: f64 = values[..window].iter().sum();
    result.push(sum / window_f);

    for i in window..values.len() {
        sum += values[i] - values[i - window];
        result.push(sum / window_f);
    }

    result
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_window_zero() {
        assert!(rolling_mean(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn sma_insufficient_data() {
        assert!(rolling_mean(&[1.0, 2.0, 3.0], 5).is_empty());
    }

    #[test]
    fn sma_known_values() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let sma = rolling_mean(&values, 3);
        assert_eq!(sma, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn sma_output_length() {
        let values: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        assert_eq!(rolling_mean(&values, 5).len(), 16);
        assert_eq!(rolling_mean(&values, 20).len(), 1);
    }

    #[test]
    fn sma_window_one_is_identity() {
        let values = vec![3.5, 7.0, 1.25];
        assert_eq!(rolling_mean(&values, 1), values);
    }
}
