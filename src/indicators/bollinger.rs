// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Upper band = SMA + k*s, lower band = SMA - k*s, where s is the rolling
// sample standard deviation (ddof = 1) of the close over the same window.
// One band pair per input element starting at index `window - 1`.

use crate::indicators::sma::rolling_mean;

/// Rolling band series over one window.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSeries {
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Compute Bollinger bands for `values` over `window` with `num_std`
/// deviations.
///
/// Output vectors have length `values.len() - window + 1`, aligned with the
/// rolling mean.  Returns empty series when the input is shorter than the
/// window or the window is degenerate (0 or 1 — a single sample has no
/// sample deviation).
pub fn bollinger_bands(values: &[f64], window: usize, num_std: f64) -> BandSeries {
    if window < 2 || values.len() < window {
        return BandSeries {
            upper: Vec::new(),
            lower: Vec::new(),
        };
    }

    let means = rolling_mean(values, window);
    let mut upper = Vec::with_capacity(means.len());
    let mut lower = Vec::with_capacity(means.len());

    for (i, &mean) in means.iter().enumerate() {
        let slice = &values[i..i + window];
        // Sample variance: divide by (window - 1).
        let variance =
            slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (window - 1) as f64;
        let std_dev = variance.sqrt();

        upper.push(mean + num_std * std_dev);
        lower.push(mean - num_std * std_dev);
    }

    BandSeries { upper, lower }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_insufficient_data() {
        let bands = bollinger_bands(&[1.0, 2.0, 3.0], 20, 2.0);
        assert!(bands.upper.is_empty());
        assert!(bands.lower.is_empty());
    }

    #[test]
    fn bollinger_degenerate_window() {
        assert!(bollinger_bands(&[1.0, 2.0], 0, 2.0).upper.is_empty());
        assert!(bollinger_bands(&[1.0, 2.0], 1, 2.0).upper.is_empty());
    }

    #[test]
    fn bollinger_flat_input_collapses_to_mean() {
        let values = vec![100.0; 25];
        let bands = bollinger_bands(&values, 20, 2.0);
        assert_eq!(bands.upper.len(), 6);
        for (&u, &l) in bands.upper.iter().zip(&bands.lower) {
            assert!((u - 100.0).abs() < 1e-10);
            assert!((l - 100.0).abs() < 1e-10);
        }
    }

    #[test]
    fn bollinger_uses_sample_std() {
        // values 1..=4, window 4: mean 2.5, sample variance
        // ((1.5^2)*2 + (0.5^2)*2) / 3 = 5/3.
        let values = vec![1.0, 2.0, 3.0, 4.0];
        let bands = bollinger_bands(&values, 4, 2.0);
        let expected_std = (5.0_f64 / 3.0).sqrt();
        assert_eq!(bands.upper.len(), 1);
        assert!((bands.upper[0] - (2.5 + 2.0 * expected_std)).abs() < 1e-10);
        assert!((bands.lower[0] - (2.5 - 2.0 * expected_std)).abs() < 1e-10);
    }

    #[test]
    fn bands_straddle_the_mean() {
        let values: Vec<f64> = (1..=30).map(|x| (x as f64).sin() * 10.0 + 50.0).collect();
        let bands = bollinger_bands(&values, 20, 2.0);
        let means = rolling_mean(&values, 20);
        for i in 0..means.len() {
            assert!(bands.upper[i] >= means[i]);
            assert!(bands.lower[i] <= means[i]);
        }
    }
}
