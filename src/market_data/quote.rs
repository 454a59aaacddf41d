// =============================================================================
// Quote — fundamentals snapshot for a single symbol
// =============================================================================
//
// Every field except the symbol is optional: providers routinely omit
// fundamentals for futures, indices, and thinly covered listings.  Callers
// must not read a missing field as zero.

use serde::{Deserialize, Serialize};

/// Fundamentals snapshot as normalized from the provider's quote payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    /// Dividend yield as a fraction (0.025 = 2.5 %).
    pub dividend_yield: Option<f64>,
    /// Return on equity as a fraction.
    pub return_on_equity: Option<f64>,
    /// Net profit margin as a fraction.
    pub profit_margin: Option<f64>,
    pub beta: Option<f64>,
}
