// =============================================================================
// Financial Health Analysis
// =============================================================================
//
// Coarse valuation/profitability bands over a fundamentals quote.  Missing
// inputs produce an `N/A` status, never an error — fundamentals are absent
// for futures and indices as a matter of course.
//
// Bands:
//   P/E    < 15 undervalued, > 35 overvalued, otherwise fair.
//   ROE    > 20 % excellent, > 15 % good, otherwise average.
//   Margin > 20 % counts as a moat.

use serde::Serialize;

use crate::market_data::Quote;

/// Valuation band derived from trailing P/E.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationBand {
    Undervalued,
    Fair,
    Overvalued,
    NotAvailable,
}

/// Profitability band derived from return on equity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitabilityBand {
    Excellent,
    Good,
    Average,
    NotAvailable,
}

/// Competitive-position band derived from net profit margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginBand {
    Moat,
    Competitive,
    NotAvailable,
}

/// Health assessment attached to the quote endpoint response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthAssessment {
    pub valuation: ValuationBand,
    pub profitability: ProfitabilityBand,
    pub margin: MarginBand,
}

/// Assess a quote's fundamentals.
pub fn assess(quote: &Quote) -> HealthAssessment {
    let valuation = match quote.trailing_pe {
        Some(pe) if pe < 15.0 => ValuationBand::Undervalued,
        Some(pe) if pe > 35.0 => ValuationBand::Overvalued,
        Some(_) => ValuationBand::Fair,
        None => ValuationBand::NotAvailable,
    };

    let profitability = match quote.return_on_equity {
        Some(roe) if roe > 0.20 => ProfitabilityBand::Excellent,
        Some(roe) if roe > 0.15 => ProfitabilityBand::Good,
        Some(_) => ProfitabilityBand::Average,
        None => ProfitabilityBand::NotAvailable,
    };

    let margin = match quote.profit_margin {
        Some(m) if m > 0.20 => MarginBand::Moat,
        Some(_) => MarginBand::Competitive,
        None => MarginBand::NotAvailable,
    };

    HealthAssessment {
        valuation,
        profitability,
        margin,
    }
}
