// =============================================================================
// Symbol Table — immutable code → display-name lookup
// =============================================================================
//
// Built exactly once at startup and injected by shared reference through
// `AppState`.  Write-once/read-many: no lazy population, no ambient global
// state, no lock.  Unknown codes resolve to a `CODE <code>` fallback label so
// the UI never renders an empty name.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

/// Immutable symbol → display-name map.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    names: HashMap<String, String>,
}

/// One entry of the table as exposed by the symbols endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolEntry {
    pub code: String,
    pub name: String,
}

impl SymbolTable {
    /// Built-in futures and benchmark listings.
    pub fn builtin() -> Self {
        let names = [
            // Futures / commodities / crypto.
            ("WTX=F", "Taiwan Index Futures (TX)"),
            ("YM=F", "Mini Dow Futures (YM)"),
            ("NQ=F", "Nasdaq 100 Futures (NQ)"),
            ("ES=F", "S&P 500 Futures (ES)"),
            ("GC=F", "Gold Futures"),
            ("CL=F", "Crude Oil Futures"),
            ("BTC-USD", "Bitcoin"),
            ("DX=F", "US Dollar Index Futures"),
            // Benchmark indices and large caps.
            ("^TWII", "Taiwan Weighted Index (TSE)"),
            ("^GSPC", "S&P 500 (SPX)"),
            ("^IXIC", "Nasdaq Composite (IXIC)"),
            ("^SOX", "PHLX Semiconductor (SOX)"),
            ("2330.TW", "TSMC (2330)"),
            ("0050.TW", "Yuanta Taiwan 50 (0050)"),
        ]
        .into_iter()
        .map(|(code, name)| (code.to_string(), name.to_string()))
        .collect();

        Self { names }
    }

    /// Extend the built-in table with a user-supplied JSON listing file of
    /// the shape `{ "code": "display name", ... }`.
    pub fn with_listing_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut table = Self::builtin();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read symbol listing from {}", path.display()))?;
        let extra: HashMap<String, String> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse symbol listing from {}", path.display()))?;

        let added = extra.len();
        table.names.extend(extra);
        info!(path = %path.display(), added, "symbol listing merged");
        Ok(table)
    }

    /// Display name for `code`, falling back to a `CODE <code>` label.
    pub fn display_name(&self, code: &str) -> String {
        self.names
            .get(code)
            .cloned()
            .unwrap_or_else(|| format!("CODE {code}"))
    }

    /// All entries sorted by code, for the symbols endpoint.
    pub fn entries(&self) -> Vec<SymbolEntry> {
        let mut entries: Vec<SymbolEntry> = self
            .names
            .iter()
            .map(|(code, name)| SymbolEntry {
                code: code.clone(),
                name: name.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.code.cmp(&b.code));
        entries
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_benchmarks() {
        let table = SymbolTable::builtin();
        assert_eq!(table.display_name("^TWII"), "Taiwan Weighted Index (TSE)");
        assert_eq!(table.display_name("^GSPC"), "S&P 500 (SPX)");
        assert!(!table.entries().is_empty());
    }

    #[test]
    fn unknown_code_gets_fallback_label() {
        let table = SymbolTable::builtin();
        assert_eq!(table.display_name("9999.TW"), "CODE 9999.TW");
    }

    #[test]
    fn entries_are_sorted_by_code() {
        let entries = SymbolTable::builtin().entries();
        for pair in entries.windows(2) {
            assert!(pair[0].code < pair[1].code);
        }
    }

    #[test]
    fn listing_file_merges_over_builtin() {
        let dir = std::env::temp_dir();
        let path = dir.join("quotedeck_symbols_test.json");
        std::fs::write(&path, r#"{ "2317.TW": "Hon Hai (2317)" }"#).unwrap();

        let table = SymbolTable::with_listing_file(&path).unwrap();
        assert_eq!(table.display_name("2317.TW"), "Hon Hai (2317)");
        assert_eq!(table.display_name("^SOX"), "PHLX Semiconductor (SOX)");

        std::fs::remove_file(&path).ok();
    }
}
