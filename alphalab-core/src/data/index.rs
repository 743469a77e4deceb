//! Canonical asset and date indices.
//!
//! Position in each list is the integer id used everywhere downstream.
//! Both are built once, before the run, and never reassigned.

use super::provider::PriceRow;
use crate::domain::{AssetId, DateId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Ordered, de-duplicated asset identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetIndex {
    symbols: Vec<String>,
}

impl AssetIndex {
    /// Build from symbols, keeping first-seen order and dropping repeats.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for symbol in symbols {
            let symbol = symbol.into();
            if !out.contains(&symbol) {
                out.push(symbol);
            }
        }
        Self { symbols: out }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbol(&self, id: AssetId) -> Option<&str> {
        self.symbols.get(id).map(|s| s.as_str())
    }

    pub fn id_of(&self, symbol: &str) -> Option<AssetId> {
        self.symbols.iter().position(|s| s == symbol)
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub(crate) fn lookup(&self) -> HashMap<&str, AssetId> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i))
            .collect()
    }
}

/// Ascending, de-duplicated calendar dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateIndex {
    dates: Vec<NaiveDate>,
}

impl DateIndex {
    /// Build from arbitrary dates; sorts ascending and drops repeats.
    pub fn new<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Self {
        let set: BTreeSet<NaiveDate> = dates.into_iter().collect();
        Self {
            dates: set.into_iter().collect(),
        }
    }

    /// The unique dates present in `rows`, ascending.
    pub fn from_rows(rows: &[PriceRow]) -> Self {
        Self::new(rows.iter().map(|r| r.date))
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn date(&self, id: DateId) -> Option<NaiveDate> {
        self.dates.get(id).copied()
    }

    pub fn id_of(&self, date: NaiveDate) -> Option<DateId> {
        self.dates.binary_search(&date).ok()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}
