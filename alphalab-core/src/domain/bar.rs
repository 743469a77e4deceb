//! Cell — one OHLCV observation in the price panel.

use serde::{Deserialize, Serialize};

/// OHLCV observation for a single asset on a single date.
///
/// A missing observation is a void cell: all price fields NaN, volume 0.
/// The validity mask, not the cell, is the source of truth for whether an
/// observation exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Cell {
    /// Cell standing in for a missing (date, asset) observation.
    pub fn void() -> Self {
        Self {
            open: f64::NAN,
            high: f64::NAN,
            low: f64::NAN,
            close: f64::NAN,
            volume: 0,
        }
    }

    /// Returns true if any OHLC field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Whether `close` can be used as an execution price.
    pub fn has_tradable_close(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}
