// =============================================================================
// QuoteDeck — Main Entry Point
// =============================================================================
//
// Market-data dashboard backend: quotes, history with indicator overlays,
// intraday bars, order-book depth, and rebased return comparisons, served
// over REST plus a WebSocket quote push.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analysis;
mod api;
mod app_state;
mod cache;
mod config;
mod error;
mod format;
mod indicators;
mod market_data;
mod provider;
mod returns;
mod symbols;

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::config::AppConfig;
use crate::symbols::SymbolTable;

const CONFIG_PATH: &str = "quotedeck.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║               QuoteDeck — Starting Up                   ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let mut config = AppConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Env overrides for container deployments.
    if let Ok(addr) = std::env::var("QUOTEDECK_BIND_ADDR") {
        config.bind_addr = addr;
    }
    if let Ok(url) = std::env::var("QUOTEDECK_PROVIDER_URL") {
        config.provider_base_url = url;
    }

    info!(
        bind_addr = %config.bind_addr,
        provider = %config.provider_base_url,
        exchange = %config.exchange_base_url,
        benchmark = %config.default_benchmark,
        "configuration resolved"
    );

    // ── 2. Build the symbol table ────────────────────────────────────────
    // Constructed once here and injected; never mutated after startup.
    let symbols = match &config.symbol_listing_path {
        Some(path) => SymbolTable::with_listing_file(path)?,
        None => SymbolTable::builtin(),
    };

    // ── 3. Build shared state ────────────────────────────────────────────
    let state = Arc::new(AppState::new(config, symbols));

    // ── 4. Start the API server ──────────────────────────────────────────
    let bind_addr = state.config.bind_addr.clone();
    let app = api::rest::router(state.clone());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            warn!("Shutdown signal received — stopping gracefully");
        })
        .await?;

    // Persist the resolved config (defaults + env overrides) so the next
    // start sees the same settings.
    if let Err(e) = state.config.save(CONFIG_PATH) {
        error!(error = %e, "Failed to save config on shutdown");
    }

    info!("QuoteDeck shut down complete.");
    Ok(())
}
