//! Price loading for the runner.
//!
//! Given a list of symbols and a [`PriceSource`], fetches rows over the
//! configured range and builds the shared panel context. Symbols the source
//! has no rows for stay in the asset index as fully-void columns; they never
//! trade and keep their cash sub-account intact.

use alphalab_core::data::{AssetIndex, DataError, PanelContext, PriceSource};
use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, warn};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("asset list is empty")]
    EmptyUniverse,

    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Options controlling which rows are loaded.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// First date to load (inclusive).
    pub start: NaiveDate,
    /// Last date to load (inclusive).
    pub end: NaiveDate,
}

/// Panel context plus load diagnostics.
#[derive(Debug)]
pub struct LoadedData {
    pub ctx: PanelContext,
    /// Number of rows the source returned.
    pub row_count: usize,
    /// Fraction of void cells per symbol.
    pub void_rates: HashMap<String, f64>,
    /// Requested symbols with no rows in range.
    pub missing_symbols: Vec<String>,
}

/// Fetch rows for `symbols` and build the panel.
///
/// The date axis is the sorted set of dates present in the fetched rows.
pub fn load_panel(
    symbols: &[String],
    source: &dyn PriceSource,
    opts: &LoadOptions,
) -> Result<LoadedData, LoadError> {
    let assets = AssetIndex::new(symbols.iter().cloned());
    if assets.is_empty() {
        return Err(LoadError::EmptyUniverse);
    }

    let rows = source.fetch(assets.symbols(), opts.start, opts.end)?;
    let ctx = PanelContext::from_rows(&rows, assets);

    let void_rates: HashMap<String, f64> = ctx
        .assets
        .symbols()
        .iter()
        .cloned()
        .zip(ctx.valid.void_rates())
        .collect();

    let missing_symbols: Vec<String> = ctx
        .assets
        .symbols()
        .iter()
        .filter(|s| !rows.iter().any(|r| &r.symbol == *s))
        .cloned()
        .collect();

    for symbol in &missing_symbols {
        warn!(symbol = %symbol, source = source.name(), "no price rows in range");
    }

    info!(
        source = source.name(),
        rows = rows.len(),
        assets = ctx.n_assets(),
        dates = ctx.n_dates(),
        start = %opts.start,
        end = %opts.end,
        "panel built"
    );

    Ok(LoadedData {
        ctx,
        row_count: rows.len(),
        void_rates,
        missing_symbols,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alphalab_core::data::{InMemorySource, PriceRow};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn row(date: &str, symbol: &str, close: f64) -> PriceRow {
        PriceRow {
            date: d(date),
            symbol: symbol.to_string(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    fn opts() -> LoadOptions {
        LoadOptions {
            start: d("2021-01-01"),
            end: d("2021-12-31"),
        }
    }

    #[test]
    fn builds_panel_over_present_dates() {
        let source = InMemorySource::new(vec![
            row("2021-01-04", "AAA", 10.0),
            row("2021-01-05", "AAA", 11.0),
            row("2021-01-05", "BBB", 20.0),
            row("2020-12-31", "AAA", 9.0),
        ]);
        let loaded = load_panel(&["AAA".into(), "BBB".into()], &source, &opts()).unwrap();

        assert_eq!(loaded.row_count, 3);
        assert_eq!(loaded.ctx.n_dates(), 2);
        assert_eq!(loaded.ctx.n_assets(), 2);
        assert!(!loaded.ctx.is_valid(0, 1));
        assert_eq!(loaded.void_rates["AAA"], 0.0);
        assert_eq!(loaded.void_rates["BBB"], 0.5);
        assert!(loaded.missing_symbols.is_empty());
    }

    #[test]
    fn unknown_symbol_is_reported_missing() {
        let source = InMemorySource::new(vec![row("2021-01-04", "AAA", 10.0)]);
        let loaded = load_panel(&["AAA".into(), "ZZZ".into()], &source, &opts()).unwrap();
        assert_eq!(loaded.missing_symbols, vec!["ZZZ".to_string()]);
        assert_eq!(loaded.void_rates["ZZZ"], 1.0);
    }

    #[test]
    fn empty_symbol_list_is_rejected() {
        let source = InMemorySource::new(vec![]);
        let err = load_panel(&[], &source, &opts()).unwrap_err();
        assert!(matches!(err, LoadError::EmptyUniverse));
    }

    #[test]
    fn empty_range_gives_empty_axis() {
        let source = InMemorySource::new(vec![row("2022-01-04", "AAA", 10.0)]);
        let loaded = load_panel(&["AAA".into()], &source, &opts()).unwrap();
        assert_eq!(loaded.ctx.n_dates(), 0);
        assert_eq!(loaded.row_count, 0);
    }
}
