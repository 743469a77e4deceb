//! Engine configuration, mutable simulation state, and run output types.

use super::commission::CommissionSchedule;
use super::EngineError;
use crate::domain::{AssetId, DateId, LedgerEntry, TradeEvent};
use serde::{Deserialize, Serialize};

pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;

/// Configuration for a single backtest run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Total starting capital, split evenly across assets.
    pub initial_capital: f64,
    pub commission: CommissionSchedule,
}

impl EngineConfig {
    pub fn new(initial_capital: f64, commission: CommissionSchedule) -> Self {
        Self {
            initial_capital,
            commission,
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.initial_capital.is_finite() && self.initial_capital > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "initial_capital must be positive, got {}",
                self.initial_capital
            )));
        }
        let c = &self.commission;
        if !(c.fixed.is_finite() && c.fixed >= 0.0 && c.pct.is_finite() && c.pct >= 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "commission must be non-negative, got fixed={} pct={}",
                c.fixed, c.pct
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_CAPITAL, CommissionSchedule::default())
    }
}

/// Mutable state threaded through the forward pass.
///
/// Only the execution engine mutates it. One ledger entry and one value
/// history per asset; the portfolio value series grows by exactly one
/// element per applied date.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub(crate) ledger: Vec<LedgerEntry>,
    pub(crate) asset_values: Vec<Vec<f64>>,
    pub(crate) portfolio_values: Vec<f64>,
    /// Last valid close per asset, used to value positions on invalid days.
    pub(crate) last_valid_close: Vec<Option<f64>>,
    pub(crate) trades: Vec<TradeEvent>,
    pub(crate) total_commission: f64,
    pub(crate) next_date_id: DateId,
}

impl SimulationState {
    /// Fresh state: every asset flat with `initial_capital / n_assets` cash.
    pub fn new(initial_capital: f64, n_assets: usize) -> Result<Self, EngineError> {
        if n_assets == 0 {
            return Err(EngineError::EmptyUniverse);
        }
        let per_asset = initial_capital / n_assets as f64;
        Ok(Self {
            ledger: vec![LedgerEntry::new(per_asset); n_assets],
            asset_values: vec![Vec::new(); n_assets],
            portfolio_values: Vec::new(),
            last_valid_close: vec![None; n_assets],
            trades: Vec::new(),
            total_commission: 0.0,
            next_date_id: 0,
        })
    }

    pub fn n_assets(&self) -> usize {
        self.ledger.len()
    }

    pub fn ledger(&self) -> &[LedgerEntry] {
        &self.ledger
    }

    pub fn entry(&self, asset_id: AssetId) -> &LedgerEntry {
        &self.ledger[asset_id]
    }

    /// Per-asset `total_value` history, one element per applied date.
    pub fn asset_values(&self, asset_id: AssetId) -> &[f64] {
        &self.asset_values[asset_id]
    }

    pub fn portfolio_values(&self) -> &[f64] {
        &self.portfolio_values
    }

    pub fn trades(&self) -> &[TradeEvent] {
        &self.trades
    }

    pub fn total_commission(&self) -> f64 {
        self.total_commission
    }

    /// Date id the next step must apply.
    pub fn next_date_id(&self) -> DateId {
        self.next_date_id
    }

    /// Sum of every ledger's `total_value`.
    pub fn portfolio_value(&self) -> f64 {
        self.ledger.iter().map(|e| e.total_value).sum()
    }

    /// Verify the accounting identity on every ledger entry.
    ///
    /// Panics in debug builds if `total_value != cash + positions_value` or
    /// a position went negative.
    pub fn verify_ledger(&self) {
        #[cfg(debug_assertions)]
        {
            for (asset_id, e) in self.ledger.iter().enumerate() {
                assert!(
                    e.positions >= 0.0,
                    "negative position on asset {asset_id}: {}",
                    e.positions
                );
                let expected = e.cash + e.positions_value;
                assert!(
                    (e.total_value - expected).abs() <= 1e-9 * expected.abs().max(1.0)
                        || (e.total_value.is_nan() && expected.is_nan()),
                    "ledger identity violated on asset {asset_id}: total={} cash+positions={}",
                    e.total_value,
                    expected
                );
            }
        }
    }

    /// Consume the state into the run output.
    pub fn into_output(self, initial_capital: f64, strategy: &str) -> RunOutput {
        RunOutput {
            strategy: strategy.to_string(),
            initial_capital,
            portfolio_values: self.portfolio_values,
            asset_values: self.asset_values,
            ledger: self.ledger,
            trades: self.trades,
            total_commission: self.total_commission,
        }
    }
}

/// Everything the forward pass produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    pub strategy: String,
    pub initial_capital: f64,
    /// One value per date: sum of every asset's `total_value`.
    pub portfolio_values: Vec<f64>,
    /// Per-asset `total_value` history, indexed by asset id.
    pub asset_values: Vec<Vec<f64>>,
    /// Ledger after the final date.
    pub ledger: Vec<LedgerEntry>,
    pub trades: Vec<TradeEvent>,
    pub total_commission: f64,
}
