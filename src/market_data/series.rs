// =============================================================================
// OHLCV Series — core tabular data model
// =============================================================================
//
// A `Bar` is one row of the fixed schema every provider response is
// normalized into.  Timestamps are timezone-naive: the source timezone is
// stripped (or converted) exactly once at the provider boundary and never
// re-derived downstream.
//
// Chronological ordering of bars is an invariant consumed by every rolling
// computation; `OhlcvSeries::new` establishes it.
// =============================================================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A chronologically ordered sequence of bars for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OhlcvSeries {
    pub symbol: String,
    pub bars: Vec<Bar>,
}

impl OhlcvSeries {
    /// Build a series, sorting bars into chronological order if the source
    /// delivered them out of order.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close prices in bar order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}

// =============================================================================
// Lookback period and bar interval tokens
// =============================================================================

/// Fixed lookback-period vocabulary accepted by the history endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "3y")]
    ThreeYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "ytd")]
    YearToDate,
}

impl Period {
    /// Token as sent to the provider's `range` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::ThreeYears => "3y",
            Self::FiveYears => "5y",
            Self::YearToDate => "ytd",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bar interval: daily/weekly/monthly for history, 1-minute for intraday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1wk")]
    Weekly,
    #[serde(rename = "1mo")]
    Monthly,
    #[serde(rename = "1m")]
    OneMinute,
}

impl Interval {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Weekly => "1wk",
            Self::Monthly => "1mo",
            Self::OneMinute => "1m",
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn new_sorts_out_of_order_bars() {
        let series = OhlcvSeries::new("TEST", vec![bar(3, 3.0), bar(1, 1.0), bar(2, 2.0)]);
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn period_tokens_round_trip_through_serde() {
        for (p, tok) in [
            (Period::ThreeMonths, "\"3mo\""),
            (Period::SixMonths, "\"6mo\""),
            (Period::OneYear, "\"1y\""),
            (Period::YearToDate, "\"ytd\""),
        ] {
            assert_eq!(serde_json::to_string(&p).unwrap(), tok);
            let back: Period = serde_json::from_str(tok).unwrap();
            assert_eq!(back, p);
        }
    }

    #[test]
    fn interval_tokens_match_provider_vocabulary() {
        assert_eq!(Interval::Daily.as_str(), "1d");
        assert_eq!(Interval::Weekly.as_str(), "1wk");
        assert_eq!(Interval::Monthly.as_str(), "1mo");
        assert_eq!(Interval::OneMinute.as_str(), "1m");
    }
}
