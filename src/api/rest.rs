// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`.  Each user-initiated fetch-and-render
// cycle runs synchronously to completion inside its handler: the comparison
// endpoint fetches its two series sequentially, and a slow upstream call
// blocks only that request.
//
// Every failure path maps through `DataError::into_response`, so callers can
// branch on the machine-readable reason instead of special-casing empty
// bodies.
//
// CORS is configured permissively for development; tighten `allowed_origins`
// in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::analysis::{self, HealthAssessment};
use crate::app_state::AppState;
use crate::error::DataError;
use crate::format::{format_number, percentage_change};
use crate::indicators::{self, IndicatorTable};
use crate::market_data::{Bar, Interval, Period, Quote};
use crate::returns::{self, ReturnPair};

/// Rolling window of the intraday average-price overlay, in bars.
const INTRADAY_AVG_WINDOW: usize = 30;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/symbols", get(symbols))
        .route("/api/v1/quote/:symbol", get(quote))
        .route("/api/v1/history/:symbol", get(history))
        .route("/api/v1/intraday/:symbol", get(intraday))
        .route("/api/v1/compare", get(compare))
        .route("/api/v1/orderbook/:code", get(orderbook))
        // ── WebSocket (handled in the ws module but mounted here) ───────
        .route("/api/v1/ws", get(crate::api::ws::ws_handler))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.uptime_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Symbols
// =============================================================================

async fn symbols(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.symbols.entries())
}

// =============================================================================
// Quote (fundamentals + health assessment)
// =============================================================================

#[derive(Serialize)]
struct QuoteResponse {
    display_name: String,
    quote: Quote,
    health: HealthAssessment,
    /// Percent change vs. previous close, when both prices are known.
    #[serde(skip_serializing_if = "Option::is_none")]
    change_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    change_direction: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    market_cap_display: Option<String>,
}

async fn quote(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<impl IntoResponse, DataError> {
    let quote = state.quote(&symbol).await?;
    let health = analysis::assess(&quote);

    let (change_pct, change_direction) =
        match (quote.current_price, quote.previous_close) {
            (Some(current), Some(previous)) => {
                let (pct, dir) = percentage_change(current, previous);
                (Some(pct), Some(dir))
            }
            _ => (None, None),
        };

    let market_cap_display = quote.market_cap.map(|cap| format_number(cap, "$"));

    Ok(Json(QuoteResponse {
        display_name: state.symbols.display_name(&symbol),
        quote,
        health,
        change_pct,
        change_direction,
        market_cap_display,
    }))
}

// =============================================================================
// History (OHLCV + indicator columns)
// =============================================================================

#[derive(Deserialize)]
struct HistoryQuery {
    period: Option<Period>,
    interval: Option<Interval>,
}

async fn history(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<IndicatorTable>, DataError> {
    let period = query.period.unwrap_or(Period::SixMonths);
    let interval = query.interval.unwrap_or(Interval::Daily);

    let series = state.history(&symbol, period, interval).await?;
    let table = indicators::enrich(&series)?;

    info!(
        symbol,
        %period,
        %interval,
        bars = table.bars.len(),
        has_indicators = table.indicators.is_some(),
        "history served"
    );
    Ok(Json(table))
}

// =============================================================================
// Intraday (1-minute bars + rolling average overlay)
// =============================================================================

#[derive(Serialize)]
struct IntradayResponse {
    symbol: String,
    display_name: String,
    bars: Vec<Bar>,
    /// 30-bar rolling mean of the close, aligned 1:1 with `bars`.
    average: Vec<Option<f64>>,
}

async fn intraday(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<impl IntoResponse, DataError> {
    let series = state.provider.fetch_intraday(&symbol).await?;

    let closes = series.closes();
    let average = indicators::table::align(
        indicators::sma::rolling_mean(&closes, INTRADAY_AVG_WINDOW),
        INTRADAY_AVG_WINDOW - 1,
        closes.len(),
    );

    Ok(Json(IntradayResponse {
        display_name: state.symbols.display_name(&symbol),
        symbol: series.symbol,
        bars: series.bars,
        average,
    }))
}

// =============================================================================
// Compare (rebased percentage returns)
// =============================================================================

#[derive(Deserialize)]
struct CompareQuery {
    main: String,
    bench: Option<String>,
    period: Option<Period>,
}

async fn compare(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<ReturnPair>, DataError> {
    let bench = query
        .bench
        .unwrap_or_else(|| state.config.default_benchmark.clone());
    let period = query.period.unwrap_or(Period::OneYear);

    // Sequential by design: no parallel fetch, no cancellation.
    let main_series = state.history(&query.main, period, Interval::Daily).await?;
    let bench_series = state.history(&bench, period, Interval::Daily).await?;

    let pair = returns::compare(&main_series, &bench_series)?;

    info!(
        main = %query.main,
        bench = %bench,
        %period,
        rows = pair.rows.len(),
        delta_pct = pair.summary.delta_pct,
        "comparison served"
    );
    Ok(Json(pair))
}

// =============================================================================
// Order book
// =============================================================================

async fn orderbook(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, DataError> {
    // The exchange feed keys on the bare stock code.
    let code = code.trim_end_matches(".TW");
    let book = state.exchange.fetch_order_book(code).await?;
    Ok(Json(book))
}
