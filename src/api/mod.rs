// =============================================================================
// HTTP API — REST endpoints plus the WebSocket quote push
// =============================================================================

pub mod rest;
pub mod ws;
