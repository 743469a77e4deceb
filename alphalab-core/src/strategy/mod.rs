//! Strategy interface — pluggable signal generation.
//!
//! A strategy ("alpha") is initialized once with the read-only panel context
//! and then asked for one signal vector per date id, in ascending order.
//! Only the sign of each value matters to the default execution rule:
//! `> 0` go fully long, `< 0` go flat, `0` hold.
//!
//! # Lookahead
//! Strategies may read any cell at a date id `<=` the current one. Reading
//! future cells is a usage error that is not mechanically prevented.

pub mod factory;
pub mod fixtures;
pub mod ma_crossover;

pub use factory::{build_strategy, StrategyConfig};
pub use fixtures::{BuyAndHold, HoldSignal};
pub use ma_crossover::MaCrossover;

use crate::data::PanelContext;
use crate::domain::DateId;
use std::sync::Arc;
use thiserror::Error;

/// One signal per asset for a single date, in asset id order.
pub type SignalVector = Vec<f64>;

/// Errors raised while constructing a strategy.
#[derive(Debug, Error, PartialEq)]
pub enum StrategyError {
    #[error("invalid parameters for {strategy}: {reason}")]
    InvalidParams {
        strategy: &'static str,
        reason: String,
    },
}

/// Signal generator driven by the backtest loop.
///
/// # Invariants
/// - `signal_for()` returns exactly `ctx.n_assets()` values
/// - `signal_for()` is called once per date id, strictly ascending
/// - signals never see ledger state
pub trait Strategy: Send {
    /// Receive the panel, mask, and indices. Called once before the first date.
    fn initialize(&mut self, ctx: Arc<PanelContext>);

    /// Fresh signal vector for `date_id`.
    fn signal_for(&mut self, date_id: DateId) -> SignalVector;

    /// Strategy name for logs and result metadata.
    fn name(&self) -> &str;

    /// Number of trailing dates needed before signals can be non-zero.
    fn max_lookback(&self) -> usize {
        0
    }
}

/// Zero-filled signal vector sized for `ctx`.
pub fn zero_signals(ctx: &PanelContext) -> SignalVector {
    vec![0.0; ctx.n_assets()]
}
