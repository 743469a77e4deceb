//! CSV price source.
//!
//! Reads a flat export with header `date,symbol,open,high,low,close,volume`,
//! one row per (date, symbol) with data available. Column order does not
//! matter; extra columns are ignored.

use super::provider::{parse_date, DataError, PriceRow, PriceSource};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CsvRecord {
    date: String,
    symbol: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    // Providers disagree on integer vs float volume.
    volume: f64,
}

impl CsvRecord {
    fn into_row(self) -> Result<PriceRow, DataError> {
        Ok(PriceRow {
            date: parse_date(&self.date)?,
            symbol: self.symbol.trim().to_string(),
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume.max(0.0) as u64,
        })
    }
}

/// Price source reading a single CSV file.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    path: PathBuf,
}

impl CsvPriceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every row in the file, in file order.
    pub fn read_all(&self) -> Result<Vec<PriceRow>, DataError> {
        let file = std::fs::File::open(&self.path).map_err(|source| DataError::Io {
            path: self.path.clone(),
            source,
        })?;
        read_rows(file)
    }
}

/// Parse price rows from any CSV reader.
pub fn read_rows<R: std::io::Read>(reader: R) -> Result<Vec<PriceRow>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for record in rdr.deserialize::<CsvRecord>() {
        rows.push(record?.into_row()?);
    }
    Ok(rows)
}

impl PriceSource for CsvPriceSource {
    fn name(&self) -> &str {
        "csv"
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
        let all = self.read_all()?;
        let total = all.len();
        let rows: Vec<PriceRow> = all
            .into_iter()
            .filter(|r| r.date >= start && r.date <= end)
            .filter(|r| symbols.iter().any(|s| s == &r.symbol))
            .collect();
        debug!(
            path = %self.path.display(),
            total,
            kept = rows.len(),
            "read price rows"
        );
        Ok(rows)
    }
}
