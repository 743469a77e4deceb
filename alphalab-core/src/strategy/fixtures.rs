//! Trivial strategies used as conformance fixtures and baselines.

use super::{zero_signals, SignalVector, Strategy};
use crate::data::PanelContext;
use crate::domain::DateId;
use std::sync::Arc;

/// Always `+1` on valid cells: buys on the first valid date and never sells.
#[derive(Debug, Clone, Default)]
pub struct BuyAndHold {
    ctx: Option<Arc<PanelContext>>,
}

impl BuyAndHold {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Strategy for BuyAndHold {
    fn initialize(&mut self, ctx: Arc<PanelContext>) {
        self.ctx = Some(ctx);
    }

    fn signal_for(&mut self, date_id: DateId) -> SignalVector {
        let Some(ctx) = self.ctx.as_deref() else {
            return SignalVector::new();
        };
        let mut signals = zero_signals(ctx);
        for (asset_id, signal) in signals.iter_mut().enumerate() {
            if ctx.is_valid(date_id, asset_id) {
                *signal = 1.0;
            }
        }
        signals
    }

    fn name(&self) -> &str {
        "buy_and_hold"
    }
}

/// Always `0`: never trades.
#[derive(Debug, Clone, Default)]
pub struct HoldSignal {
    n_assets: usize,
}

impl HoldSignal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Strategy for HoldSignal {
    fn initialize(&mut self, ctx: Arc<PanelContext>) {
        self.n_assets = ctx.n_assets();
    }

    fn signal_for(&mut self, _date_id: DateId) -> SignalVector {
        vec![0.0; self.n_assets]
    }

    fn name(&self) -> &str {
        "hold"
    }
}
