//! Moving-average crossover strategy.
//!
//! Compares a short and a long trailing mean of `close`:
//! - `+1` when the short mean is above the long mean
//! - `-1` otherwise
//! - `0` on invalid cells or while either window lacks clean history

use super::{zero_signals, SignalVector, Strategy, StrategyError};
use crate::data::PanelContext;
use crate::domain::{AssetId, DateId};
use std::sync::Arc;

pub const DEFAULT_SHORT_WINDOW: usize = 40;
pub const DEFAULT_LONG_WINDOW: usize = 100;

/// Moving-average crossover signal.
///
/// # Parameters
/// - `short_window`: fast mean length (default 40)
/// - `long_window`: slow mean length (default 100)
#[derive(Debug, Clone)]
pub struct MaCrossover {
    short_window: usize,
    long_window: usize,
    ctx: Option<Arc<PanelContext>>,
}

impl MaCrossover {
    pub fn new(short_window: usize, long_window: usize) -> Result<Self, StrategyError> {
        if short_window == 0 {
            return Err(StrategyError::InvalidParams {
                strategy: "ma_crossover",
                reason: "short_window must be > 0".into(),
            });
        }
        if long_window <= short_window {
            return Err(StrategyError::InvalidParams {
                strategy: "ma_crossover",
                reason: format!(
                    "long_window ({long_window}) must be > short_window ({short_window})"
                ),
            });
        }
        Ok(Self {
            short_window,
            long_window,
            ctx: None,
        })
    }

    pub fn short_window(&self) -> usize {
        self.short_window
    }

    pub fn long_window(&self) -> usize {
        self.long_window
    }

    /// Trailing mean of `close` over `window` dates ending at `date_id`.
    ///
    /// `None` while `date_id < window` or if any cell in the window is invalid.
    fn sma(ctx: &PanelContext, date_id: DateId, asset_id: AssetId, window: usize) -> Option<f64> {
        if date_id < window {
            return None;
        }
        let mut sum = 0.0;
        for d in (date_id + 1 - window)..=date_id {
            if !ctx.is_valid(d, asset_id) {
                return None;
            }
            sum += ctx.panel.close(d, asset_id);
        }
        Some(sum / window as f64)
    }
}

impl Default for MaCrossover {
    fn default() -> Self {
        Self {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
            ctx: None,
        }
    }
}

impl Strategy for MaCrossover {
    fn initialize(&mut self, ctx: Arc<PanelContext>) {
        self.ctx = Some(ctx);
    }

    fn signal_for(&mut self, date_id: DateId) -> SignalVector {
        let Some(ctx) = self.ctx.as_deref() else {
            return SignalVector::new();
        };
        let mut signals = zero_signals(ctx);
        for (asset_id, signal) in signals.iter_mut().enumerate() {
            if !ctx.is_valid(date_id, asset_id) {
                continue;
            }
            let short = Self::sma(ctx, date_id, asset_id, self.short_window);
            let long = Self::sma(ctx, date_id, asset_id, self.long_window);
            if let (Some(s), Some(l)) = (short, long) {
                *signal = if s > l { 1.0 } else { -1.0 };
            }
        }
        signals
    }

    fn name(&self) -> &str {
        "ma_crossover"
    }

    fn max_lookback(&self) -> usize {
        self.long_window
    }
}
