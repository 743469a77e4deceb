//! Execution engine — applies one date's signals to every asset's ledger.
//!
//! Each ledger is a two-state machine {FLAT, LONG}:
//! - `signal > 0` and cash available: buy with all cash (FLAT → LONG)
//! - `signal < 0` and shares held: sell everything (LONG → FLAT)
//! - otherwise hold
//!
//! Trades are only placed on valid cells with a finite, positive close.
//! Invalid days are holds, and positions are valued at the asset's last
//! valid close so a gap never turns the ledger into NaN.

use super::commission::CommissionSchedule;
use super::state::SimulationState;
use super::EngineError;
use crate::data::PanelContext;
use crate::domain::{AssetId, DateId, LedgerEntry, TradeEvent, TradeSide};
use tracing::{debug, trace};

/// What happened to one asset's ledger on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    Buy,
    Sell,
    Hold,
    /// Signal asked for a trade but the cell was not tradable.
    SkippedInvalid,
}

/// Applies signal vectors to the simulation state.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionEngine {
    commission: CommissionSchedule,
}

impl ExecutionEngine {
    pub fn new(commission: CommissionSchedule) -> Self {
        Self { commission }
    }

    pub fn commission(&self) -> &CommissionSchedule {
        &self.commission
    }

    /// Apply `signals` for `date_id`, revalue every ledger, and append one
    /// element to each value history and the portfolio value series.
    ///
    /// `date_id` must equal `state.next_date_id()` and lie inside `ctx`,
    /// and `state` must track the same assets as `ctx`.
    pub fn apply(
        &self,
        state: &mut SimulationState,
        ctx: &PanelContext,
        date_id: DateId,
        signals: &[f64],
    ) -> Result<Vec<StepAction>, EngineError> {
        if date_id != state.next_date_id {
            return Err(EngineError::OutOfOrder {
                expected: state.next_date_id,
                got: date_id,
            });
        }
        let n_assets = state.n_assets();
        if n_assets != ctx.n_assets() {
            return Err(EngineError::ContextMismatch {
                state_assets: n_assets,
                ctx_assets: ctx.n_assets(),
            });
        }
        if date_id >= ctx.n_dates() {
            return Err(EngineError::DateOutOfRange {
                date_id,
                n_dates: ctx.n_dates(),
            });
        }
        if signals.len() != n_assets {
            return Err(EngineError::SignalLength {
                date_id,
                expected: n_assets,
                got: signals.len(),
            });
        }

        let mut actions = Vec::with_capacity(n_assets);
        for (asset_id, &signal) in signals.iter().enumerate() {
            actions.push(self.step_asset(state, ctx, date_id, asset_id, signal));
        }

        let value = state.portfolio_value();
        state.portfolio_values.push(value);
        state.next_date_id += 1;
        state.verify_ledger();
        Ok(actions)
    }

    fn step_asset(
        &self,
        state: &mut SimulationState,
        ctx: &PanelContext,
        date_id: DateId,
        asset_id: AssetId,
        signal: f64,
    ) -> StepAction {
        let cell = ctx.panel.cell(date_id, asset_id);
        let tradable = ctx.is_valid(date_id, asset_id) && cell.has_tradable_close();
        let price = cell.close;

        let entry = &mut state.ledger[asset_id];
        let wants_buy = signal > 0.0 && entry.cash > 0.0;
        let wants_sell = signal < 0.0 && entry.is_long();

        let action = if !tradable {
            if wants_buy || wants_sell {
                StepAction::SkippedInvalid
            } else {
                StepAction::Hold
            }
        } else if wants_buy {
            match self.buy(entry, price) {
                Some((shares, commission)) => {
                    state.trades.push(TradeEvent {
                        date_id,
                        asset_id,
                        side: TradeSide::Buy,
                        price,
                        shares,
                        commission,
                    });
                    state.total_commission += commission;
                    StepAction::Buy
                }
                None => StepAction::Hold,
            }
        } else if wants_sell {
            let (shares, commission) = self.sell(entry, price);
            state.trades.push(TradeEvent {
                date_id,
                asset_id,
                side: TradeSide::Sell,
                price,
                shares,
                commission,
            });
            state.total_commission += commission;
            StepAction::Sell
        } else {
            StepAction::Hold
        };

        if tradable {
            state.last_valid_close[asset_id] = Some(price);
        }
        let mark = state.last_valid_close[asset_id].unwrap_or(0.0);
        let entry = &mut state.ledger[asset_id];
        entry.revalue(mark);
        state.asset_values[asset_id].push(entry.total_value);

        match action {
            StepAction::Buy | StepAction::Sell => debug!(
                date_id,
                asset_id,
                action = ?action,
                price,
                cash = entry.cash,
                positions = entry.positions,
                "trade executed"
            ),
            StepAction::SkippedInvalid => {
                trace!(date_id, asset_id, signal, "trade skipped on invalid cell")
            }
            StepAction::Hold => {}
        }
        action
    }

    /// Spend all cash at `price`. Returns `(shares, commission)`, or `None`
    /// when the commission would consume the whole balance.
    fn buy(&self, entry: &mut LedgerEntry, price: f64) -> Option<(f64, f64)> {
        let trade_value = entry.cash;
        let commission = self.commission.commission(trade_value);
        if trade_value <= commission {
            return None;
        }
        let shares = (trade_value - commission) / price;
        entry.positions += shares;
        entry.cash = 0.0;
        Some((shares, commission))
    }

    /// Liquidate the whole position at `price`. Returns `(shares, commission)`.
    fn sell(&self, entry: &mut LedgerEntry, price: f64) -> (f64, f64) {
        let shares = entry.positions;
        let trade_value = shares * price;
        let commission = self.commission.commission(trade_value);
        entry.cash += trade_value - commission;
        entry.positions = 0.0;
        (shares, commission)
    }
}
