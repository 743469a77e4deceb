//! LedgerEntry — isolated cash/position account for one asset.

use serde::{Deserialize, Serialize};

/// Per-asset account.
///
/// Each asset trades against its own cash sub-account; there is no shared
/// capital pool. After every revaluation:
/// `positions_value == positions * price` and
/// `total_value == cash + positions_value`. `positions` is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub cash: f64,
    pub positions: f64,
    pub positions_value: f64,
    pub total_value: f64,
}

impl LedgerEntry {
    /// Flat account holding only cash.
    pub fn new(cash: f64) -> Self {
        Self {
            cash,
            positions: 0.0,
            positions_value: 0.0,
            total_value: cash,
        }
    }

    /// Whether the account currently holds shares.
    pub fn is_long(&self) -> bool {
        self.positions > 0.0
    }

    /// Mark the account to `price`.
    pub fn revalue(&mut self, price: f64) {
        self.positions_value = self.positions * price;
        self.total_value = self.cash + self.positions_value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_is_flat() {
        let entry = LedgerEntry::new(5_000.0);
        assert!(!entry.is_long());
        assert_eq!(entry.total_value, 5_000.0);
        assert_eq!(entry.positions_value, 0.0);
    }

    #[test]
    fn revalue_holds_accounting_identity() {
        let mut entry = LedgerEntry {
            cash: 10.0,
            positions: 2.0,
            positions_value: 0.0,
            total_value: 0.0,
        };
        entry.revalue(50.0);
        assert_eq!(entry.positions_value, 100.0);
        assert_eq!(entry.total_value, 110.0);
    }
}
