//! Performance statistics — pure functions over the portfolio value series.
//!
//! Every metric is a pure function: value series and/or daily returns in,
//! scalar out. No dependencies on the engine or data pipeline. Degenerate
//! inputs (empty series, zero variance) produce NaN or infinity, never a panic.

use serde::{Deserialize, Serialize};

/// Trading days per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// The six headline statistics of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub total_return: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub max_drawdown: f64,
}

impl PerformanceStats {
    /// Compute all statistics from the portfolio value series.
    pub fn compute(values: &[f64], initial_capital: f64) -> Self {
        let returns = daily_returns(values);
        let total = total_return(values, initial_capital);
        let annual = annualized_return(total, values.len());
        let vol = annualized_volatility(&returns);
        Self {
            total_return: total,
            annualized_return: annual,
            annualized_volatility: vol,
            sharpe_ratio: sharpe_ratio(annual, vol),
            sortino_ratio: sortino_ratio(&returns, annual),
            max_drawdown: max_drawdown(values),
        }
    }

    /// Statistics of an empty run: everything undefined.
    pub fn undefined() -> Self {
        Self {
            total_return: f64::NAN,
            annualized_return: f64::NAN,
            annualized_volatility: f64::NAN,
            sharpe_ratio: f64::NAN,
            sortino_ratio: f64::NAN,
            max_drawdown: f64::NAN,
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return as a fraction: `final / initial_capital - 1`.
///
/// NaN for an empty series or non-positive capital.
pub fn total_return(values: &[f64], initial_capital: f64) -> f64 {
    match values.last() {
        Some(&last) if initial_capital > 0.0 => last / initial_capital - 1.0,
        _ => f64::NAN,
    }
}

/// Period-over-period percentage change.
///
/// Same length as `values`; the first element is NaN by construction.
pub fn daily_returns(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(f64::NAN);
    out.extend(values.windows(2).map(|w| (w[1] - w[0]) / w[0]));
    out
}

/// Compound the total return to a 252-day year:
/// `(1 + total_return)^(252 / n_days) - 1`.
pub fn annualized_return(total_return: f64, n_days: usize) -> f64 {
    if n_days == 0 {
        return f64::NAN;
    }
    (1.0 + total_return).powf(TRADING_DAYS_PER_YEAR / n_days as f64) - 1.0
}

/// Sample standard deviation of daily returns, scaled by `sqrt(252)`.
pub fn annualized_volatility(returns: &[f64]) -> f64 {
    sample_std(returns) * TRADING_DAYS_PER_YEAR.sqrt()
}

/// `annualized_return / annualized_volatility`, risk-free rate zero.
pub fn sharpe_ratio(annualized_return: f64, annualized_volatility: f64) -> f64 {
    annualized_return / annualized_volatility
}

/// Like Sharpe, but the denominator is the annualized standard deviation
/// of negative daily returns only.
pub fn sortino_ratio(returns: &[f64], annualized_return: f64) -> f64 {
    let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    let downside_vol = sample_std(&downside) * TRADING_DAYS_PER_YEAR.sqrt();
    annualized_return / downside_vol
}

/// Largest peak-to-trough decline as a negative fraction
/// (e.g. -0.25 = 25% drawdown). Zero for monotonically rising series.
pub fn max_drawdown(values: &[f64]) -> f64 {
    let Some(&first) = values.first() else {
        return f64::NAN;
    };
    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &v in values {
        if v > peak {
            peak = v;
        }
        let dd = (v - peak) / peak;
        if dd < max_dd {
            max_dd = dd;
        }
    }
    max_dd
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Sample (n - 1) standard deviation, skipping NaN. NaN with < 2 samples.
pub(crate) fn sample_std(values: &[f64]) -> f64 {
    let clean: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if clean.len() < 2 {
        return f64::NAN;
    }
    let mean = clean.iter().sum::<f64>() / clean.len() as f64;
    let variance =
        clean.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (clean.len() - 1) as f64;
    variance.sqrt()
}
