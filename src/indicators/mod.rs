// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator math over close-price slices, plus the
// table layer that aligns results into optional per-bar columns.  Dense
// per-indicator functions return only defined values; `table::enrich` is the
// one place that knows about warm-up alignment and column omission.

pub mod bollinger;
pub mod rsi;
pub mod sma;
pub mod table;

pub use table::{enrich, IndicatorTable};
