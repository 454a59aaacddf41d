// =============================================================================
// Return Normalizer — rebased percentage-return comparison of two series
// =============================================================================
//
// Two OHLCV series are reduced, via exact inner join on timestamp, to a single
// table of close prices and percentage returns.  Only dates present in both
// series survive the join: asymmetric trading-calendar dates are excluded by
// policy, so two instruments with different calendars share one baseline.
//
// Returns are rebased to the first *jointly observed* date, not to each
// series' independent start — otherwise the chart begins with a misleading
// divergent baseline.  The first joined row therefore reads exactly 0 / 0.
// =============================================================================

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::DataError;
use crate::market_data::OhlcvSeries;

/// One joined row of the comparison table.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnRow {
    pub timestamp: NaiveDateTime,
    pub close_main: f64,
    pub close_bench: f64,
    pub return_main_pct: f64,
    pub return_bench_pct: f64,
}

/// Which side ends the window ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComparisonStatus {
    Leading,
    Lagging,
}

/// Final-row summary of a comparison (the dashboard's status card).
#[derive(Debug, Clone, Serialize)]
pub struct ReturnSummary {
    pub final_return_main_pct: f64,
    pub final_return_bench_pct: f64,
    pub delta_pct: f64,
    pub status: ComparisonStatus,
}

/// Result of joining and rebasing two series.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnPair {
    pub symbol_main: String,
    pub symbol_bench: String,
    pub rows: Vec<ReturnRow>,
    pub summary: ReturnSummary,
}

/// Join `main` and `bench` on timestamp and compute rebased percent returns.
///
/// # Errors
/// - [`DataError::CalendarMismatch`] when the two series share no timestamp.
/// - [`DataError::DegenerateBase`] when either side's first joint close is
///   zero (rebasing would emit infinite returns); no rows are produced.
pub fn compare(main: &OhlcvSeries, bench: &OhlcvSeries) -> Result<ReturnPair, DataError> {
    // Inner join: index the benchmark closes, walk the main series in order.
    // Exact timestamp match, no tolerance.
    let bench_closes: HashMap<NaiveDateTime, f64> = bench
        .bars
        .iter()
        .map(|b| (b.timestamp, b.close))
        .collect();

    let joined: Vec<(NaiveDateTime, f64, f64)> = main
        .bars
        .iter()
        .filter_map(|b| {
            bench_closes
                .get(&b.timestamp)
                .map(|&bc| (b.timestamp, b.close, bc))
        })
        .collect();

    if joined.is_empty() {
        return Err(DataError::CalendarMismatch);
    }

    // Rebase to the chronologically earliest common date.
    let (_, base_main, base_bench) = joined[0];
    if base_main == 0.0 {
        return Err(DataError::DegenerateBase {
            symbol: main.symbol.clone(),
        });
    }
    if base_bench == 0.0 {
        return Err(DataError::DegenerateBase {
            symbol: bench.symbol.clone(),
        });
    }

    let rows: Vec<ReturnRow> = joined
        .into_iter()
        .map(|(timestamp, close_main, close_bench)| ReturnRow {
            timestamp,
            close_main,
            close_bench,
            return_main_pct: (close_main / base_main - 1.0) * 100.0,
            return_bench_pct: (close_bench / base_bench - 1.0) * 100.0,
        })
        .collect();

    let last = rows.last().expect("joined rows are non-empty");
    let delta_pct = last.return_main_pct - last.return_bench_pct;
    let summary = ReturnSummary {
        final_return_main_pct: last.return_main_pct,
        final_return_bench_pct: last.return_bench_pct,
        delta_pct,
        status: if delta_pct > 0.0 {
            ComparisonStatus::Leading
        } else {
            ComparisonStatus::Lagging
        },
    };

    Ok(ReturnPair {
        symbol_main: main.symbol.clone(),
        symbol_bench: bench.symbol.clone(),
        rows,
        summary,
    })
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::Bar;
    use chrono::NaiveDate;

    fn series(symbol: &str, start_day: u32, closes: &[f64]) -> OhlcvSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: NaiveDate::from_ymd_opt(2024, 3, start_day)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 0.0,
            })
            .collect();
        OhlcvSeries::new(symbol, bars)
    }

    #[test]
    fn first_row_is_the_rebasing_point() {
        let main = series("MAIN", 1, &[123.4, 130.0, 128.0]);
        let bench = series("BENCH", 1, &[55.0, 54.0, 56.0]);
        let pair = compare(&main, &bench).unwrap();
        assert_eq!(pair.rows[0].return_main_pct, 0.0);
        assert_eq!(pair.rows[0].return_bench_pct, 0.0);
    }

    #[test]
    fn concrete_five_day_scenario() {
        let main = series("MAIN", 1, &[100.0, 102.0, 101.0, 105.0, 110.0]);
        let bench = series("BENCH", 1, &[50.0, 50.5, 49.0, 51.0, 52.0]);
        let pair = compare(&main, &bench).unwrap();

        let expected_main = [0.0, 2.0, 1.0, 5.0, 10.0];
        let expected_bench = [0.0, 1.0, -2.0, 2.0, 4.0];
        assert_eq!(pair.rows.len(), 5);
        for (row, (&em, &eb)) in pair
            .rows
            .iter()
            .zip(expected_main.iter().zip(expected_bench.iter()))
        {
            assert!((row.return_main_pct - em).abs() < 1e-9, "main {em}");
            assert!((row.return_bench_pct - eb).abs() < 1e-9, "bench {eb}");
        }

        assert!((pair.summary.final_return_main_pct - 10.0).abs() < 1e-9);
        assert!((pair.summary.delta_pct - 6.0).abs() < 1e-9);
        assert_eq!(pair.summary.status, ComparisonStatus::Leading);
    }

    #[test]
    fn disjoint_calendars_are_a_mismatch_not_an_empty_success() {
        let main = series("MAIN", 1, &[100.0, 101.0]);
        let bench = series("BENCH", 20, &[50.0, 51.0]);
        assert_eq!(compare(&main, &bench).unwrap_err(), DataError::CalendarMismatch);
    }

    #[test]
    fn join_drops_asymmetric_dates() {
        // Main trades days 1..=4; bench skips day 2 (holiday).
        let main = series("MAIN", 1, &[100.0, 101.0, 102.0, 103.0]);
        let mut bench = series("BENCH", 1, &[50.0, 51.0, 52.0, 53.0]);
        bench.bars.remove(1);
        let pair = compare(&main, &bench).unwrap();
        assert_eq!(pair.rows.len(), 3);
        // Day 2 is absent from the joined table.
        assert!(pair
            .rows
            .iter()
            .all(|r| r.timestamp != main.bars[1].timestamp));
    }

    #[test]
    fn zero_base_on_main_is_degenerate() {
        let main = series("MAIN", 1, &[0.0, 1.0, 2.0]);
        let bench = series("BENCH", 1, &[50.0, 51.0, 52.0]);
        let err = compare(&main, &bench).unwrap_err();
        assert_eq!(err, DataError::DegenerateBase { symbol: "MAIN".into() });
    }

    #[test]
    fn zero_base_on_bench_is_degenerate() {
        let main = series("MAIN", 1, &[100.0, 101.0]);
        let bench = series("BENCH", 1, &[0.0, 51.0]);
        let err = compare(&main, &bench).unwrap_err();
        assert_eq!(err, DataError::DegenerateBase { symbol: "BENCH".into() });
    }

    #[test]
    fn lagging_when_bench_outperforms() {
        let main = series("MAIN", 1, &[100.0, 101.0]);
        let bench = series("BENCH", 1, &[100.0, 110.0]);
        let pair = compare(&main, &bench).unwrap();
        assert_eq!(pair.summary.status, ComparisonStatus::Lagging);
        assert!(pair.summary.delta_pct < 0.0);
    }
}
