// =============================================================================
// Market-Data Provider Client — chart + fundamentals REST endpoints
// =============================================================================
//
// Wraps a Yahoo-chart-style JSON API and normalizes every response into the
// fixed OHLCV schema regardless of provider field names.  Normalization
// guarantees at this boundary, consumed by everything downstream:
//   - chronological bar ordering,
//   - timezone-naive timestamps (the exchange GMT offset is applied once,
//     here, and never re-derived),
//   - rows with a null close are dropped, never half-filled.
//
// Failures collapse per the error taxonomy: an empty payload is `NoData`, a
// transport or parse failure is `Provider` — the rest of the system treats
// both as "absent" and only the attached detail differs.
// =============================================================================

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime};
use tracing::{debug, instrument, warn};

use crate::error::DataError;
use crate::market_data::{Bar, Interval, OhlcvSeries, Period, Quote};

/// REST client for the time-series/fundamentals provider.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    base_url: String,
    client: reqwest::Client,
}

impl ProviderClient {
    /// Create a new client against `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    // -------------------------------------------------------------------------
    // History
    // -------------------------------------------------------------------------

    /// Fetch a historical OHLCV series for `symbol` over `period` at
    /// `interval`.
    #[instrument(skip(self), name = "provider::fetch_history")]
    pub async fn fetch_history(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<OhlcvSeries, DataError> {
        let series = self
            .chart(symbol, period.as_str(), interval.as_str())
            .await
            .map_err(|e| DataError::Provider(e.to_string()))?;

        if series.is_empty() {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        }

        debug!(symbol, bars = series.len(), "history fetched");
        Ok(series)
    }

    // -------------------------------------------------------------------------
    // Intraday
    // -------------------------------------------------------------------------

    /// Fetch today's 1-minute bars.
    ///
    /// When today's session is empty (market not yet open, holiday), fall
    /// back to a 5-day window and keep only the most recent session's bars.
    #[instrument(skip(self), name = "provider::fetch_intraday")]
    pub async fn fetch_intraday(&self, symbol: &str) -> Result<OhlcvSeries, DataError> {
        let series = self
            .chart(symbol, "1d", "1m")
            .await
            .map_err(|e| DataError::Provider(e.to_string()))?;

        let series = if series.is_empty() {
            debug!(symbol, "today's session empty, falling back to 5d window");
            let wide = self
                .chart(symbol, "5d", "1m")
                .await
                .map_err(|e| DataError::Provider(e.to_string()))?;
            last_session(wide)
        } else {
            series
        };

        if series.is_empty() {
            return Err(DataError::NoData {
                symbol: symbol.to_string(),
            });
        }

        debug!(symbol, bars = series.len(), "intraday fetched");
        Ok(series)
    }

    // -------------------------------------------------------------------------
    // Fundamentals
    // -------------------------------------------------------------------------

    /// Fetch the fundamentals quote for `symbol`.
    #[instrument(skip(self), name = "provider::fetch_fundamentals")]
    pub async fn fetch_fundamentals(&self, symbol: &str) -> Result<Quote, DataError> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules=price,summaryDetail,financialData,defaultKeyStatistics",
            self.base_url, symbol
        );

        let body = self
            .get_json(&url)
            .await
            .map_err(|e| DataError::Provider(e.to_string()))?;

        let result = body["quoteSummary"]["result"]
            .as_array()
            .and_then(|arr| arr.first())
            .cloned()
            .ok_or_else(|| DataError::NoData {
                symbol: symbol.to_string(),
            })?;

        Ok(parse_quote_payload(symbol, &result))
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    /// GET the chart endpoint and normalize the payload into a series.
    async fn chart(&self, symbol: &str, range: &str, interval: &str) -> Result<OhlcvSeries> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval={}",
            self.base_url, symbol, range, interval
        );

        let body = self.get_json(&url).await?;
        parse_chart_payload(symbol, &body)
    }

    /// GET `url`, enforce a success status, parse the body as JSON.
    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url} request failed"))?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .with_context(|| format!("failed to parse response from {url}"))?;

        if !status.is_success() {
            anyhow::bail!("provider returned {status} for {url}: {body}");
        }

        Ok(body)
    }
}

// =============================================================================
// Payload normalization (pure, unit-tested)
// =============================================================================

/// Normalize a chart payload into an `OhlcvSeries`.
///
/// Expected shape:
/// ```json
/// { "chart": { "result": [ {
///     "meta": { "gmtoffset": 28800 },
///     "timestamp": [ 1700000000, ... ],
///     "indicators": { "quote": [ { "open": [...], "high": [...],
///                                  "low": [...], "close": [...],
///                                  "volume": [...] } ] }
/// } ], "error": null } }
/// ```
///
/// An explicit provider error or a missing result yields an empty series
/// (the caller maps empty to `NoData`).  Rows whose close is null are
/// dropped; null open/high/low fall back to the close so a bar is never
/// half-filled.
fn parse_chart_payload(symbol: &str, body: &serde_json::Value) -> Result<OhlcvSeries> {
    if !body["chart"]["error"].is_null() {
        warn!(symbol, error = %body["chart"]["error"], "provider chart error");
        return Ok(OhlcvSeries::new(symbol, Vec::new()));
    }

    let result = match body["chart"]["result"].as_array().and_then(|a| a.first()) {
        Some(r) => r,
        None => return Ok(OhlcvSeries::new(symbol, Vec::new())),
    };

    // Source timezone is stripped here, exactly once: epoch seconds plus the
    // exchange GMT offset become naive exchange-local timestamps.
    let gmt_offset = result["meta"]["gmtoffset"].as_i64().unwrap_or(0);

    let timestamps = match result["timestamp"].as_array() {
        Some(t) => t,
        None => return Ok(OhlcvSeries::new(symbol, Vec::new())),
    };

    let quote = &result["indicators"]["quote"]
        .as_array()
        .and_then(|a| a.first())
        .cloned()
        .context("chart payload missing indicators.quote")?;

    let field = |name: &str, i: usize| -> Option<f64> {
        quote[name].as_array().and_then(|a| a.get(i)).and_then(|v| v.as_f64())
    };

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let epoch = match ts.as_i64() {
            Some(e) => e,
            None => continue,
        };
        // Close is mandatory; a row without one is dropped entirely.
        let close = match field("close", i) {
            Some(c) => c,
            None => continue,
        };

        let timestamp = naive_from_epoch(epoch, gmt_offset)
            .with_context(|| format!("timestamp {epoch} out of range"))?;

        bars.push(Bar {
            timestamp,
            open: field("open", i).unwrap_or(close),
            high: field("high", i).unwrap_or(close),
            low: field("low", i).unwrap_or(close),
            close,
            volume: field("volume", i).unwrap_or(0.0),
        });
    }

    Ok(OhlcvSeries::new(symbol, bars))
}

/// Epoch seconds + exchange offset → naive exchange-local timestamp.
fn naive_from_epoch(epoch: i64, gmt_offset: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(epoch + gmt_offset, 0).map(|dt| dt.naive_utc())
}

/// Keep only the bars belonging to the most recent session (calendar date)
/// in `series`.
fn last_session(series: OhlcvSeries) -> OhlcvSeries {
    let last_date = match series.bars.last() {
        Some(bar) => bar.timestamp.date(),
        None => return series,
    };
    let bars = series
        .bars
        .into_iter()
        .filter(|b| b.timestamp.date() == last_date)
        .collect();
    OhlcvSeries::new(series.symbol, bars)
}

/// Normalize a quoteSummary result entry into a `Quote`.
///
/// Numeric fields may arrive either as plain numbers or wrapped as
/// `{ "raw": 123.4, "fmt": "123.40" }`; both are accepted.  The dividend
/// yield prefers `dividendYield` and falls back to
/// `trailingAnnualDividendYield`.
fn parse_quote_payload(symbol: &str, result: &serde_json::Value) -> Quote {
    let price = &result["price"];
    let detail = &result["summaryDetail"];
    let financial = &result["financialData"];
    let stats = &result["defaultKeyStatistics"];

    let dividend_yield =
        raw_f64(&detail["dividendYield"]).or_else(|| raw_f64(&detail["trailingAnnualDividendYield"]));

    Quote {
        symbol: symbol.to_string(),
        current_price: raw_f64(&price["regularMarketPrice"])
            .or_else(|| raw_f64(&financial["currentPrice"])),
        previous_close: raw_f64(&price["regularMarketPreviousClose"])
            .or_else(|| raw_f64(&detail["previousClose"])),
        market_cap: raw_f64(&price["marketCap"]),
        trailing_pe: raw_f64(&detail["trailingPE"]),
        forward_pe: raw_f64(&stats["forwardPE"]),
        peg_ratio: raw_f64(&stats["pegRatio"]),
        dividend_yield,
        return_on_equity: raw_f64(&financial["returnOnEquity"]),
        profit_margin: raw_f64(&financial["profitMargins"]),
        beta: raw_f64(&detail["beta"]),
    }
}

/// Accept a plain JSON number or a `{ "raw": n }` wrapper.
fn raw_f64(val: &serde_json::Value) -> Option<f64> {
    val.as_f64().or_else(|| val["raw"].as_f64())
}
