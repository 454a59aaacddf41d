pub mod quote;
pub mod series;

// Re-export the core tabular types for convenient access
// (e.g. `use crate::market_data::Bar`).
pub use quote::Quote;
pub use series::{Bar, Interval, OhlcvSeries, Period};
