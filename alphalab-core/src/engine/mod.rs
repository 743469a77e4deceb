//! Backtesting engine — per-asset ledger state machine and forward-pass loop.
//!
//! The loop walks the date axis once, strictly ascending. For each date:
//!
//! 1. Ask the strategy for that date's signal vector
//! 2. Apply it to every asset's isolated ledger (buy all / sell all / hold)
//! 3. Revalue every ledger at the date's close and record the portfolio value

pub mod commission;
pub mod execution;
pub mod loop_runner;
pub mod state;

pub use commission::CommissionSchedule;
pub use execution::{ExecutionEngine, StepAction};
pub use loop_runner::run_backtest;
pub use state::{EngineConfig, RunOutput, SimulationState};

use crate::domain::DateId;
use thiserror::Error;

/// Errors raised by the engine. All are programming or configuration errors.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("asset list is empty")]
    EmptyUniverse,

    #[error("invalid engine config: {0}")]
    InvalidConfig(String),

    #[error("signal vector for date {date_id} has {got} values, expected {expected}")]
    SignalLength {
        date_id: DateId,
        expected: usize,
        got: usize,
    },

    #[error("date {got} applied out of order (expected {expected})")]
    OutOfOrder { expected: DateId, got: DateId },

    #[error("state tracks {state_assets} assets but the panel has {ctx_assets}")]
    ContextMismatch {
        state_assets: usize,
        ctx_assets: usize,
    },

    #[error("date {date_id} is outside the panel ({n_dates} dates)")]
    DateOutOfRange { date_id: DateId, n_dates: usize },
}
