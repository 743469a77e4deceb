//! Price source trait and structured error types.
//!
//! The PriceSource trait abstracts over where flat OHLCV rows come from
//! (CSV export, in-memory fixtures) so the panel builder never depends on a
//! particular provider.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// One provider row: a single symbol's OHLCV observation on a single date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub symbol: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed price CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { value: String },

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// Trait for price row sources.
///
/// Implementations return every row they have for the requested symbols
/// within `[start, end]` (inclusive). Sparse coverage is allowed: a missing
/// row becomes an invalid panel cell, not an error.
pub trait PriceSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch daily OHLCV rows for `symbols` over a date range.
    fn fetch(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceRow>, DataError>;
}

/// Source backed by rows already in memory. Used by tests and benches.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    rows: Vec<PriceRow>,
}

impl InMemorySource {
    pub fn new(rows: Vec<PriceRow>) -> Self {
        Self { rows }
    }
}

impl PriceSource for InMemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn fetch(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceRow>, DataError> {
        if start > end {
            return Err(DataError::InvalidRange { start, end });
        }
        Ok(self
            .rows
            .iter()
            .filter(|r| r.date >= start && r.date <= end)
            .filter(|r| symbols.iter().any(|s| s == &r.symbol))
            .cloned()
            .collect())
    }
}

/// Parse a `YYYY-MM-DD` date string.
pub fn parse_date(value: &str) -> Result<NaiveDate, DataError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| DataError::InvalidDate {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, symbol: &str, close: f64) -> PriceRow {
        PriceRow {
            date: parse_date(date).unwrap(),
            symbol: symbol.into(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 100,
        }
    }

    #[test]
    fn in_memory_filters_symbols_and_range() {
        let source = InMemorySource::new(vec![
            row("2024-01-01", "AAPL", 1.0),
            row("2024-01-02", "AAPL", 2.0),
            row("2024-01-03", "AAPL", 3.0),
            row("2024-01-02", "MSFT", 4.0),
        ]);
        let rows = source
            .fetch(
                &["AAPL".to_string()],
                parse_date("2024-01-02").unwrap(),
                parse_date("2024-01-03").unwrap(),
            )
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.symbol == "AAPL"));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let source = InMemorySource::default();
        let err = source
            .fetch(
                &[],
                parse_date("2024-02-01").unwrap(),
                parse_date("2024-01-01").unwrap(),
            )
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidRange { .. }));
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("2024-13-40").is_err());
        assert!(parse_date(" 2024-01-05 ").is_ok());
    }
}
