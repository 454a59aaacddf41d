// =============================================================================
// Application Configuration
// =============================================================================
//
// Every tunable lives here: bind address, upstream endpoints, timeouts, and
// cache TTLs.  Persistence uses an atomic tmp + rename pattern to prevent
// corruption on crash.  All fields carry `#[serde(default)]` so that adding
// new fields never breaks loading an older config file.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_provider_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_exchange_base_url() -> String {
    "https://mis.twse.com.tw".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_history_cache_ttl_secs() -> u64 {
    300
}

fn default_quote_cache_ttl_secs() -> u64 {
    60
}

fn default_benchmark() -> String {
    "^TWII".to_string()
}

fn default_ws_push_interval_secs() -> u64 {
    15
}

// =============================================================================
// AppConfig
// =============================================================================

/// Top-level configuration for the dashboard backend.
///
/// Every field has a serde default so that older JSON files missing new
/// fields will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL of the time-series/fundamentals provider.
    #[serde(default = "default_provider_base_url")]
    pub provider_base_url: String,

    /// Base URL of the local exchange realtime feed (order book).
    #[serde(default = "default_exchange_base_url")]
    pub exchange_base_url: String,

    /// Per-request timeout for outbound HTTP calls, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// TTL for cached history series, in seconds.
    #[serde(default = "default_history_cache_ttl_secs")]
    pub history_cache_ttl_secs: u64,

    /// TTL for cached fundamentals quotes, in seconds.
    #[serde(default = "default_quote_cache_ttl_secs")]
    pub quote_cache_ttl_secs: u64,

    /// Benchmark the compare endpoint falls back to when none is given.
    #[serde(default = "default_benchmark")]
    pub default_benchmark: String,

    /// Optional JSON file of extra symbol → display-name entries.
    #[serde(default)]
    pub symbol_listing_path: Option<String>,

    /// Interval between WebSocket quote pushes, in seconds.
    #[serde(default = "default_ws_push_interval_secs")]
    pub ws_push_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            provider_base_url: default_provider_base_url(),
            exchange_base_url: default_exchange_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            history_cache_ttl_secs: default_history_cache_ttl_secs(),
            quote_cache_ttl_secs: default_quote_cache_ttl_secs(),
            default_benchmark: default_benchmark(),
            symbol_listing_path: None,
            ws_push_interval_secs: default_ws_push_interval_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            provider = %config.provider_base_url,
            "config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content =
            serde_json::to_string_pretty(self).context("failed to serialise config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "config saved (atomic)");
        Ok(())
    }
}
