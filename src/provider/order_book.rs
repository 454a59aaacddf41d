// =============================================================================
// Exchange Order Book — five-level realtime quote from the local exchange
// =============================================================================
//
// The local exchange (TWSE-style) publishes the five best bid/ask levels as
// underscore-joined strings inside a JSON envelope.  This client fetches and
// reshapes that payload; it carries no book state across requests.  A closed
// market answers with "-" placeholders, which reads as `NoData`, not as a
// provider failure.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::DataError;

/// One price level of the book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookLevel {
    pub price: f64,
    pub volume: f64,
}

/// Five-level order book snapshot for a single symbol.
#[derive(Debug, Clone, Serialize)]
pub struct OrderBook {
    pub symbol: String,
    pub name: String,
    pub last_price: Option<f64>,
    /// Best bid first.
    pub bids: Vec<BookLevel>,
    /// Best ask first.
    pub asks: Vec<BookLevel>,
}

/// REST client for the exchange realtime endpoint.
#[derive(Debug, Clone)]
pub struct ExchangeClient {
    base_url: String,
    client: reqwest::Client,
}

impl ExchangeClient {
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

    /// Fetch the five best bid/ask levels for a local-exchange stock code
    /// (e.g. "2330", without any provider suffix).
    #[instrument(skip(self), name = "exchange::fetch_order_book")]
    pub async fn fetch_order_book(&self, code: &str) -> Result<OrderBook, DataError> {
        let url = format!(
            "{}/stock/api/getStockInfo.jsp?ex_ch=tse_{}.tw&json=1&delay=0",
            self.base_url, code
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DataError::Provider(format!("order book request failed: {e}")))?;

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| DataError::Provider(format!("order book parse failed: {e}")))?;

        let book = parse_realtime_payload(code, &body)?;
        debug!(code, bids = book.bids.len(), asks = book.asks.len(), "order book fetched");
        Ok(book)
    }
}

// =============================================================================
// Payload reshaping (pure, unit-tested)
// =============================================================================

/// Reshape the exchange realtime envelope into an `OrderBook`.
///
/// Expected shape:
/// ```json
/// { "rtcode": "0000", "msgArray": [ {
///     "c": "2330", "n": "TSMC", "z": "585.00",
///     "a": "585.00_586.00_587.00_588.00_589.00", "f": "100_200_300_400_500",
///     "b": "584.00_583.00_582.00_581.00_580.00", "g": "150_250_350_450_550"
/// } ] }
/// ```
///
/// A missing entry or placeholder ("-") book fields read as `NoData`
/// (market closed), never as an empty-but-successful book.
fn parse_realtime_payload(code: &str, body: &serde_json::Value) -> Result<OrderBook, DataError> {
    let entry = body["msgArray"]
        .as_array()
        .and_then(|arr| arr.first())
        .ok_or_else(|| DataError::NoData {
            symbol: code.to_string(),
        })?;

    let asks = parse_levels(&entry["a"], &entry["f"]);
    let bids = parse_levels(&entry["b"], &entry["g"]);

    if asks.is_empty() && bids.is_empty() {
        return Err(DataError::NoData {
            symbol: code.to_string(),
        });
    }

    let name = entry["n"].as_str().unwrap_or(code).to_string();
    let last_price = entry["z"].as_str().and_then(|s| s.parse::<f64>().ok());

    Ok(OrderBook {
        symbol: code.to_string(),
        name,
        last_price,
        bids,
        asks,
    })
}

/// Zip underscore-joined price and volume strings into book levels, skipping
/// placeholder entries.
fn parse_levels(prices: &serde_json::Value, volumes: &serde_json::Value) -> Vec<BookLevel> {
    let (prices, volumes) = match (prices.as_str(), volumes.as_str()) {
        (Some(p), Some(v)) => (p, v),
        _ => return Vec::new(),
    };

    prices
        .split('_')
        .zip(volumes.split('_'))
        .filter_map(|(p, v)| {
            let price = p.trim().parse::<f64>().ok()?;
            let volume = v.trim().parse::<f64>().ok()?;
            Some(BookLevel { price, volume })
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_five_levels_each_side() {
        let body = json!({
            "rtcode": "0000",
            "msgArray": [{
                "c": "2330", "n": "TSMC", "z": "585.00",
                "a": "585.00_586.00_587.00_588.00_589.00",
                "f": "100_200_300_400_500",
                "b": "584.00_583.00_582.00_581.00_580.00",
                "g": "150_250_350_450_550"
            }]
        });

        let book = parse_realtime_payload("2330", &body).unwrap();
        assert_eq!(book.name, "TSMC");
        assert_eq!(book.last_price, Some(585.0));
        assert_eq!(book.asks.len(), 5);
        assert_eq!(book.bids.len(), 5);
        assert_eq!(book.asks[0], BookLevel { price: 585.0, volume: 100.0 });
        assert_eq!(book.bids[0], BookLevel { price: 584.0, volume: 150.0 });
    }

    #[test]
    fn closed_market_placeholders_read_as_no_data() {
        let body = json!({
            "rtcode": "0000",
            "msgArray": [{
                "c": "2330", "n": "TSMC", "z": "-",
                "a": "-", "f": "-", "b": "-", "g": "-"
            }]
        });

        let err = parse_realtime_payload("2330", &body).unwrap_err();
        assert_eq!(err.reason(), "no_data");
    }

    #[test]
    fn missing_entry_reads_as_no_data() {
        let body = json!({ "rtcode": "0000", "msgArray": [] });
        let err = parse_realtime_payload("9999", &body).unwrap_err();
        assert_eq!(err.reason(), "no_data");
    }

    #[test]
    fn partial_levels_skip_placeholders() {
        let body = json!({
            "msgArray": [{
                "c": "2330", "n": "TSMC", "z": "585.00",
                "a": "585.00_586.00_-_-_-",
                "f": "100_200_-_-_-",
                "b": "584.00",
                "g": "150"
            }]
        });

        let book = parse_realtime_payload("2330", &body).unwrap();
        assert_eq!(book.asks.len(), 2);
        assert_eq!(book.bids.len(), 1);
    }
}
