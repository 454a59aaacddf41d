// =============================================================================
// Central Application State
// =============================================================================
//
// The single shared context behind every request handler, held as
// `Arc<AppState>`.  Everything here is built once in main and read-only
// afterwards except the TTL caches, which manage their own interior
// mutability.  The symbol table in particular is the write-once/read-many
// lookup the dashboard uses for display names — constructed at startup and
// injected, never lazily populated.
// =============================================================================

use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::TtlCache;
use crate::config::AppConfig;
use crate::error::DataError;
use crate::market_data::{Interval, OhlcvSeries, Period, Quote};
use crate::provider::{ExchangeClient, ProviderClient};
use crate::symbols::SymbolTable;

/// Shared state for all request handlers.
pub struct AppState {
    pub config: AppConfig,
    pub provider: ProviderClient,
    pub exchange: ExchangeClient,
    pub symbols: SymbolTable,
    pub history_cache: TtlCache<OhlcvSeries>,
    pub quote_cache: TtlCache<Quote>,
    pub start_time: Instant,
}

impl AppState {
    /// Build the full state from config plus the startup-constructed symbol
    /// table.
    pub fn new(config: AppConfig, symbols: SymbolTable) -> Self {
        let provider = ProviderClient::new(&config.provider_base_url, config.request_timeout_secs);
        let exchange = ExchangeClient::new(&config.exchange_base_url, config.request_timeout_secs);
        let history_cache = TtlCache::new(Duration::from_secs(config.history_cache_ttl_secs));
        let quote_cache = TtlCache::new(Duration::from_secs(config.quote_cache_ttl_secs));

        Self {
            config,
            provider,
            exchange,
            symbols,
            history_cache,
            quote_cache,
            start_time: Instant::now(),
        }
    }

    /// Fetch a history series through the TTL cache.
    pub async fn history(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<OhlcvSeries, DataError> {
        let key = format!("{symbol}|{period}|{interval}");
        if let Some(series) = self.history_cache.get(&key) {
            debug!(key, "history cache hit");
            return Ok(series);
        }

        let series = self.provider.fetch_history(symbol, period, interval).await?;
        self.history_cache.insert(key, series.clone());
        debug!(entries = self.history_cache.len(), "history cached");
        Ok(series)
    }

    /// Fetch a fundamentals quote through the TTL cache.
    pub async fn quote(&self, symbol: &str) -> Result<Quote, DataError> {
        if let Some(quote) = self.quote_cache.get(symbol) {
            debug!(symbol, "quote cache hit");
            return Ok(quote);
        }

        let quote = self.provider.fetch_fundamentals(symbol).await?;
        self.quote_cache.insert(symbol, quote.clone());
        debug!(symbol, entries = self.quote_cache.len(), "quote cached");
        Ok(quote)
    }

    /// Seconds since startup, for the health endpoint.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
