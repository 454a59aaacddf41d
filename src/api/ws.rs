// =============================================================================
// WebSocket Handler — Push-based quote updates
// =============================================================================
//
// Clients connect to `/api/v1/ws?symbol=<symbol>` and receive:
//   1. An immediate quote snapshot on connect.
//   2. A fresh snapshot every `ws_push_interval_secs` (config, default 15 s).
//
// Snapshots go through the same TTL quote cache as the REST endpoint, so a
// burst of connections for the same symbol costs one upstream fetch per TTL
// window.  The handler also responds to Ping frames with Pong and treats any
// inbound text frame as a heartbeat.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::app_state::AppState;
use crate::market_data::Quote;

// =============================================================================
// Query parameters
// =============================================================================

#[derive(Deserialize)]
pub struct WsQuery {
    symbol: String,
}

// =============================================================================
// Wire format
// =============================================================================

/// One outbound push frame.
#[derive(Serialize)]
struct QuotePush<'a> {
    symbol: &'a str,
    display_name: &'a str,
    /// Per-connection sequence number, incremented on every outbound frame.
    seq: u64,
    sent_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    quote: Option<Quote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

// =============================================================================
// WebSocket upgrade handler
// =============================================================================

/// Axum handler for the WebSocket upgrade request.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<WsQuery>,
) -> impl IntoResponse {
    info!(symbol = %query.symbol, "WebSocket connection accepted — upgrading");
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state, query.symbol))
}

// =============================================================================
// Connection handler
// =============================================================================

/// Manages a single WebSocket connection lifecycle.
///
/// Runs two concurrent tasks via `tokio::select!`:
///   1. **Push loop** — send a quote snapshot on every interval tick.
///   2. **Recv loop** — process incoming client messages (Ping, Close,
///      heartbeat text frames).
async fn handle_ws_connection(socket: WebSocket, state: Arc<AppState>, symbol: String) {
    let (mut sender, mut receiver) = socket.split();
    let mut sequence: u64 = 0;

    // The first tick of a tokio interval fires immediately, which doubles as
    // the on-connect snapshot.
    let mut push_interval = interval(Duration::from_secs(state.config.ws_push_interval_secs));
    push_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            // ── Push loop ───────────────────────────────────────────────
            _ = push_interval.tick() => {
                if let Err(e) = send_quote(&mut sender, &state, &symbol, &mut sequence).await {
                    debug!(error = %e, "WebSocket send failed — disconnecting");
                    break;
                }
            }

            // ── Recv loop ───────────────────────────────────────────────
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        debug!(msg = %text, "WebSocket text message received (heartbeat)");
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(e) = sender.send(Message::Pong(data)).await {
                            debug!(error = %e, "Failed to send Pong — disconnecting");
                            break;
                        }
                    }
                    Some(Ok(Message::Pong(_))) => {
                        debug!("WebSocket Pong received");
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("WebSocket Close frame received — disconnecting");
                        break;
                    }
                    Some(Ok(Message::Binary(_))) => {
                        debug!("WebSocket binary message ignored");
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "WebSocket receive error — disconnecting");
                        break;
                    }
                    None => {
                        info!("WebSocket stream ended");
                        break;
                    }
                }
            }
        }
    }

    info!(symbol, "WebSocket connection closed");
}

// =============================================================================
// Helpers
// =============================================================================

/// Fetch the current quote (through the TTL cache) and push it as one frame.
///
/// Upstream fetch failures are reported in-band via the `error` field rather
/// than tearing the connection down; only transport errors propagate.
async fn send_quote<S>(
    sender: &mut S,
    state: &Arc<AppState>,
    symbol: &str,
    sequence: &mut u64,
) -> Result<(), axum::Error>
where
    S: futures_util::Sink<Message, Error = axum::Error> + Unpin,
{
    *sequence += 1;

    let (quote, error) = match state.quote(symbol).await {
        Ok(quote) => (Some(quote), None),
        Err(e) => {
            warn!(symbol, error = %e, "quote push fetch failed");
            (None, Some(e.to_string()))
        }
    };

    let display_name = state.symbols.display_name(symbol);
    let push = QuotePush {
        symbol,
        display_name: &display_name,
        seq: *sequence,
        sent_at: chrono::Utc::now().timestamp_millis(),
        quote,
        error,
    };

    match serde_json::to_string(&push) {
        Ok(json) => {
            sender.send(Message::Text(json)).await?;
            debug!(symbol, seq = *sequence, "WebSocket quote sent");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Failed to serialize quote push");
            // Serialisation errors are not network errors; don't disconnect.
            Ok(())
        }
    }
}
