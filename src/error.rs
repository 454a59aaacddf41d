// =============================================================================
// Data Error Taxonomy
// =============================================================================
//
// Every failure the core can produce maps to one of these variants so that
// callers can branch on the reason instead of receiving an indistinguishable
// empty value.  All variants are recoverable; nothing here ever aborts the
// process.
//
//   NoData              — provider returned nothing (bad symbol, market closed,
//                         outage).
//   InsufficientHistory — fewer bars than a computation needs.
//   CalendarMismatch    — two series share no common trading date.
//   DegenerateBase      — first jointly observed close is zero; rebasing would
//                         emit division artifacts.
//   Provider            — transport or parse failure from the upstream API.
//                         The core treats this the same as NoData (absent);
//                         only the attached detail differs.
// =============================================================================

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Unified error type for all data-fetching and computation paths.
#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    NoData { symbol: String },
    InsufficientHistory { required: usize, actual: usize },
    CalendarMismatch,
    DegenerateBase { symbol: String },
    Provider(String),
}

impl DataError {
    /// Stable machine-readable reason string used in API bodies and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NoData { .. } => "no_data",
            Self::InsufficientHistory { .. } => "insufficient_history",
            Self::CalendarMismatch => "calendar_mismatch",
            Self::DegenerateBase { .. } => "degenerate_base",
            Self::Provider(_) => "provider_error",
        }
    }
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoData { symbol } => {
                write!(f, "no data available for '{symbol}'")
            }
            Self::InsufficientHistory { required, actual } => {
                write!(f, "insufficient history: need {required} bars, have {actual}")
            }
            Self::CalendarMismatch => {
                write!(f, "no overlapping trading dates between the two series")
            }
            Self::DegenerateBase { symbol } => {
                write!(f, "degenerate base price (zero) for '{symbol}'")
            }
            Self::Provider(msg) => {
                write!(f, "provider error: {msg}")
            }
        }
    }
}

impl std::error::Error for DataError {}

impl IntoResponse for DataError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NoData { .. } => StatusCode::NOT_FOUND,
            Self::InsufficientHistory { .. }
            | Self::CalendarMismatch
            | Self::DegenerateBase { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Provider(_) => StatusCode::BAD_GATEWAY,
        };

        let body = json!({
            "error": self.reason(),
            "detail": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
