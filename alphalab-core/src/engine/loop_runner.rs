//! Forward pass over the date axis.
//!
//! Strictly sequential: the ledger at date `t` depends on the ledger at
//! `t - 1`, so dates are never reordered, skipped, or processed in parallel.

use super::execution::{ExecutionEngine, StepAction};
use super::state::{EngineConfig, RunOutput, SimulationState};
use super::EngineError;
use crate::data::PanelContext;
use crate::strategy::Strategy;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Run a full backtest of `strategy` over `ctx`.
///
/// Initializes the strategy with the shared panel context, then for each
/// date id from `0` to `|dates| - 1`: asks for signals, applies them, and
/// records the portfolio value. An empty date axis yields an empty series.
pub fn run_backtest(
    ctx: Arc<PanelContext>,
    strategy: &mut dyn Strategy,
    config: &EngineConfig,
) -> Result<RunOutput, EngineError> {
    config.validate()?;
    let mut state = SimulationState::new(config.initial_capital, ctx.n_assets())?;
    let engine = ExecutionEngine::new(config.commission);

    let warmup = strategy.max_lookback();
    info!(
        strategy = strategy.name(),
        assets = ctx.n_assets(),
        dates = ctx.n_dates(),
        warmup,
        initial_capital = config.initial_capital,
        "starting backtest"
    );
    if ctx.n_dates() > 0 && warmup >= ctx.n_dates() {
        warn!(
            warmup,
            dates = ctx.n_dates(),
            "warmup covers the whole date range; strategy cannot trade"
        );
    }

    strategy.initialize(Arc::clone(&ctx));

    let mut skipped = 0usize;
    for date_id in 0..ctx.n_dates() {
        let signals = strategy.signal_for(date_id);
        let actions = engine.apply(&mut state, &ctx, date_id, &signals)?;
        skipped += actions
            .iter()
            .filter(|a| **a == StepAction::SkippedInvalid)
            .count();
        debug!(
            date_id,
            portfolio_value = state.portfolio_value(),
            "date applied"
        );
    }

    info!(
        dates = state.portfolio_values().len(),
        trades = state.trades().len(),
        skipped_on_invalid = skipped,
        final_value = state.portfolio_values().last().copied().unwrap_or(config.initial_capital),
        "backtest complete"
    );

    Ok(state.into_output(config.initial_capital, strategy.name()))
}
