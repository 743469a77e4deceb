//! Commission schedule — the greater of a flat fee and a proportional fee.
//!
//! Applied identically on entry and exit. There is no slippage model.

use serde::{Deserialize, Serialize};

pub const DEFAULT_COMMISSION_PCT: f64 = 0.001;
pub const DEFAULT_COMMISSION_FIXED: f64 = 1.0;

/// `commission = max(fixed, pct * trade_value)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommissionSchedule {
    /// Flat fee per trade, in account currency.
    pub fixed: f64,
    /// Proportional fee as a fraction of trade value (0.001 = 10 bps).
    pub pct: f64,
}

impl CommissionSchedule {
    pub fn new(fixed: f64, pct: f64) -> Self {
        Self { fixed, pct }
    }

    pub fn frictionless() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Commission charged on a trade of `trade_value`.
    pub fn commission(&self, trade_value: f64) -> f64 {
        self.fixed.max(self.pct * trade_value)
    }
}

impl Default for CommissionSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_COMMISSION_FIXED, DEFAULT_COMMISSION_PCT)
    }
}
