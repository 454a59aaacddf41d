// =============================================================================
// Indicator Table — OHLCV series augmented with derived columns
// =============================================================================
//
// Derived columns are computed once and attached alongside the bars; the base
// OHLCV data is never modified.  Each column is a `Vec<Option<f64>>` aligned
// 1:1 with the bars: `None` marks the warm-up prefix where the rolling window
// is not yet filled, so a caller can never read an undefined value as zero.
//
// When the series holds fewer than `MIN_BARS` bars the entire column block is
// omitted (`indicators: None`) instead of being populated with mostly-None
// columns — "columns absent" is the signal that insufficient history exists.
// =============================================================================

use serde::Serialize;

use crate::error::DataError;
use crate::indicators::bollinger::bollinger_bands;
use crate::indicators::rsi::wilder_rsi;
use crate::indicators::sma::rolling_mean;
use crate::market_data::{Bar, OhlcvSeries};

/// RSI lookback window.
pub const RSI_WINDOW: usize = 14;
/// Short moving-average window.
pub const SMA_SHORT_WINDOW: usize = 5;
/// Long moving-average window (also the Bollinger window).
pub const SMA_LONG_WINDOW: usize = 20;
/// Bollinger band width in standard deviations.
pub const BOLLINGER_NUM_STD: f64 = 2.0;
/// Minimum bars required before any indicator columns are attached.
pub const MIN_BARS: usize = 20;

/// The five derived columns, each aligned 1:1 with the bars.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorColumns {
    pub rsi: Vec<Option<f64>>,
    pub sma_short: Vec<Option<f64>>,
    pub sma_long: Vec<Option<f64>>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
}

/// An OHLCV series with optional derived columns attached.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorTable {
    pub symbol: String,
    pub bars: Vec<Bar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators: Option<IndicatorColumns>,
}

/// Augment `series` with RSI(14), SMA(5), SMA(20), and Bollinger(20, 2).
///
/// - Empty input fails fast with [`DataError::InsufficientHistory`].
/// - 1..MIN_BARS bars yield `indicators: None` (omission, not an error).
/// - MIN_BARS or more bars yield all five columns, `None` in each column's
///   warm-up prefix.
pub fn enrich(series: &OhlcvSeries) -> Result<IndicatorTable, DataError> {
    if series.is_empty() {
        return Err(DataError::InsufficientHistory {
            required: 1,
            actual: 0,
        });
    }

    let bars = series.bars.clone();
    if bars.len() < MIN_BARS {
        return Ok(IndicatorTable {
            symbol: series.symbol.clone(),
            bars,
            indicators: None,
        });
    }

    let closes = series.closes();
    let n = closes.len();

    // RSI's first defined value sits at index RSI_WINDOW (one seed window of
    // deltas); the rolling columns at index window-1.
    let rsi = align(wilder_rsi(&closes, RSI_WINDOW), RSI_WINDOW, n);
    let sma_short = align(rolling_mean(&closes, SMA_SHORT_WINDOW), SMA_SHORT_WINDOW - 1, n);
    let sma_long = align(rolling_mean(&closes, SMA_LONG_WINDOW), SMA_LONG_WINDOW - 1, n);

    let bands = bollinger_bands(&closes, SMA_LONG_WINDOW, BOLLINGER_NUM_STD);
    let bb_upper = align(bands.upper, SMA_LONG_WINDOW - 1, n);
    let bb_lower = align(bands.lower, SMA_LONG_WINDOW - 1, n);

    Ok(IndicatorTable {
        symbol: series.symbol.clone(),
        bars,
        indicators: Some(IndicatorColumns {
            rsi,
            sma_short,
            sma_long,
            bb_upper,
            bb_lower,
        }),
    })
}

/// Pad a dense indicator series out to `len` values, with `None` for the
/// first `offset` positions.
pub(crate) fn align(dense: Vec<f64>, offset: usize, len: usize) -> Vec<Option<f64>> {
    let mut column = vec![None; len];
    for (i, v) in dense.into_iter().enumerate() {
        if offset + i < len {
            column[offset + i] = Some(v);
        }
    }
    column
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series_of(closes: &[f64]) -> OhlcvSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000.0,
            })
            .collect();
        OhlcvSeries::new("TEST", bars)
    }

    #[test]
    fn empty_input_fails_fast() {
        let err = enrich(&series_of(&[])).unwrap_err();
        assert_eq!(err.reason(), "insufficient_history");
    }

    #[test]
    fn nineteen_bars_omit_all_columns() {
        let closes: Vec<f64> = (1..=19).map(|x| x as f64).collect();
        let table = enrich(&series_of(&closes)).unwrap();
        assert!(table.indicators.is_none());
        assert_eq!(table.bars.len(), 19);
    }

    #[test]
    fn twenty_bars_attach_all_columns() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let table = enrich(&series_of(&closes)).unwrap();
        let cols = table.indicators.expect("columns present at 20 bars");

        assert_eq!(cols.rsi.len(), 20);
        assert_eq!(cols.sma_short.len(), 20);
        assert_eq!(cols.sma_long.len(), 20);
        assert_eq!(cols.bb_upper.len(), 20);
        assert_eq!(cols.bb_lower.len(), 20);

        // Warm-up prefixes.
        assert!(cols.rsi[..RSI_WINDOW].iter().all(Option::is_none));
        assert!(cols.rsi[RSI_WINDOW].is_some());
        assert!(cols.sma_short[..4].iter().all(Option::is_none));
        assert!(cols.sma_short[4].is_some());
        assert!(cols.sma_long[..19].iter().all(Option::is_none));
        assert!(cols.sma_long[19].is_some());
        assert!(cols.bb_upper[19].is_some());
        assert!(cols.bb_lower[19].is_some());
    }

    #[test]
    fn base_columns_are_untouched() {
        let closes: Vec<f64> = (1..=25).map(|x| x as f64 * 1.5).collect();
        let series = series_of(&closes);
        let table = enrich(&series).unwrap();
        assert_eq!(table.bars, series.bars);
    }

    #[test]
    fn defined_rsi_values_are_bounded() {
        let closes: Vec<f64> = (0..40)
            .map(|i| 100.0 + ((i * 7) % 13) as f64 - 6.0)
            .collect();
        let table = enrich(&series_of(&closes)).unwrap();
        let cols = table.indicators.unwrap();
        for v in cols.rsi.iter().flatten() {
            assert!((0.0..=100.0).contains(v), "RSI {v} out of range");
        }
    }

    #[test]
    fn serialization_omits_absent_columns() {
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let table = enrich(&series_of(&closes)).unwrap();
        let json = serde_json::to_value(&table).unwrap();
        assert!(json.get("indicators").is_none());
    }
}
