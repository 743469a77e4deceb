//! Backtest runner — wires together data loading, strategy, engine, and stats.
//!
//! Two entry points:
//! - `run_single_backtest()`: fetches rows from a price source, then runs. Used by the CLI.
//! - `run_backtest_from_data()`: takes an already-built panel. Used by tests and benches.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use alphalab_core::data::{PanelContext, PriceSource};
use alphalab_core::domain::TradeEvent;
use alphalab_core::engine::{run_backtest, CommissionSchedule, EngineError};
use alphalab_core::strategy::{build_strategy, Strategy, StrategyConfig, StrategyError};

use crate::config::{BacktestConfig, ConfigError, RunId};
use crate::data_loader::{load_panel, LoadError, LoadOptions, LoadedData};
use crate::metrics::{daily_returns, PerformanceStats};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[error("strategy error: {0}")]
    Strategy(#[from] StrategyError),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    pub strategy: StrategyConfig,
    /// Asset symbols in asset id order.
    pub assets: Vec<String>,
    /// Simulated dates in date id order.
    pub dates: Vec<NaiveDate>,
    pub initial_capital: f64,
    pub commission: CommissionSchedule,
    /// Portfolio value after each date.
    pub portfolio_values: Vec<f64>,
    /// Percentage change of `portfolio_values`; the first element is NaN.
    pub daily_returns: Vec<f64>,
    pub stats: PerformanceStats,
    pub trades: Vec<TradeEvent>,
    pub total_commission: f64,
    pub void_rates: HashMap<String, f64>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl BacktestResult {
    /// Date and symbol a trade refers to.
    pub fn resolve_trade(&self, trade: &TradeEvent) -> (Option<NaiveDate>, Option<&str>) {
        (
            self.dates.get(trade.date_id).copied(),
            self.assets.get(trade.asset_id).map(String::as_str),
        )
    }
}

/// Run a single backtest: fetch rows for `assets` from `source`, simulate, and score.
///
/// The strategy is built before any data is fetched so that bad parameters
/// fail fast.
pub fn run_single_backtest(
    config: &BacktestConfig,
    assets: &[String],
    source: &dyn PriceSource,
) -> Result<BacktestResult, RunError> {
    config.validate()?;
    let strategy = build_strategy(&config.strategy)?;

    let opts = LoadOptions {
        start: config.backtest.start_date,
        end: config.backtest.end_date,
    };
    let LoadedData {
        ctx, void_rates, ..
    } = load_panel(assets, source, &opts)?;
    run_on_context(config, strategy, Arc::new(ctx), void_rates)
}

/// Run a backtest over pre-loaded data. No I/O.
pub fn run_backtest_from_data(
    config: &BacktestConfig,
    loaded: LoadedData,
) -> Result<BacktestResult, RunError> {
    let strategy = build_strategy(&config.strategy)?;
    let LoadedData {
        ctx, void_rates, ..
    } = loaded;
    run_on_context(config, strategy, Arc::new(ctx), void_rates)
}

fn run_on_context(
    config: &BacktestConfig,
    mut strategy: Box<dyn Strategy>,
    ctx: Arc<PanelContext>,
    void_rates: HashMap<String, f64>,
) -> Result<BacktestResult, RunError> {
    let engine_config = config.engine_config();
    let output = run_backtest(Arc::clone(&ctx), strategy.as_mut(), &engine_config)?;

    let stats = PerformanceStats::compute(&output.portfolio_values, engine_config.initial_capital);
    let returns = daily_returns(&output.portfolio_values);

    info!(
        strategy = %output.strategy,
        total_return = stats.total_return,
        annualized_return = stats.annualized_return,
        annualized_volatility = stats.annualized_volatility,
        sharpe = stats.sharpe_ratio,
        sortino = stats.sortino_ratio,
        max_drawdown = stats.max_drawdown,
        trades = output.trades.len(),
        "run complete"
    );

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        run_id: config.run_id(),
        strategy: config.strategy.clone(),
        assets: ctx.assets.symbols().to_vec(),
        dates: ctx.dates.dates().to_vec(),
        initial_capital: engine_config.initial_capital,
        commission: engine_config.commission,
        portfolio_values: output.portfolio_values,
        daily_returns: returns,
        stats,
        trades: output.trades,
        total_commission: output.total_commission,
        void_rates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alphalab_core::data::{InMemorySource, PriceRow};

    fn row(date: NaiveDate, symbol: &str, close: f64) -> PriceRow {
        PriceRow {
            date,
            symbol: symbol.to_string(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 100,
        }
    }

    fn config(strategy: &str) -> BacktestConfig {
        BacktestConfig::from_toml(&format!(
            r#"
[backtest]
start_date = "2021-01-01"
end_date = "2021-12-31"

[strategy]
{strategy}
"#
        ))
        .unwrap()
    }

    fn source() -> InMemorySource {
        let start = NaiveDate::from_ymd_opt(2021, 1, 4).unwrap();
        let rows = (0..5)
            .flat_map(|i| {
                let date = start + chrono::Duration::days(i);
                [row(date, "AAA", 100.0 + i as f64), row(date, "BBB", 50.0)]
            })
            .collect();
        InMemorySource::new(rows)
    }

    #[test]
    fn hold_keeps_capital_constant() {
        let result = run_single_backtest(
            &config(r#"type = "hold""#),
            &["AAA".into(), "BBB".into()],
            &source(),
        )
        .unwrap();

        assert_eq!(result.schema_version, SCHEMA_VERSION);
        assert_eq!(result.dates.len(), 5);
        assert_eq!(result.portfolio_values, vec![10_000.0; 5]);
        assert!(result.trades.is_empty());
        assert_eq!(result.stats.total_return, 0.0);
        assert!(result.daily_returns[0].is_nan());
    }

    #[test]
    fn buy_and_hold_trades_once_per_asset() {
        let result = run_single_backtest(
            &config(r#"type = "buy_and_hold""#),
            &["AAA".into(), "BBB".into()],
            &source(),
        )
        .unwrap();

        assert_eq!(result.trades.len(), 2);
        let (date, symbol) = result.resolve_trade(&result.trades[0]);
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 1, 4));
        assert_eq!(symbol, Some("AAA"));
        assert!(result.total_commission > 0.0);
    }

    #[test]
    fn bad_strategy_params_fail_before_loading() {
        let err = run_single_backtest(
            &config(
                r#"type = "ma_crossover"
short_window = 50
long_window = 10"#,
            ),
            &["AAA".into()],
            &source(),
        )
        .unwrap_err();
        assert!(matches!(err, RunError::Strategy(_)));
    }

    #[test]
    fn empty_asset_list_is_a_load_error() {
        let err = run_single_backtest(&config(r#"type = "hold""#), &[], &source()).unwrap_err();
        assert!(matches!(err, RunError::Load(LoadError::EmptyUniverse)));
    }

    #[test]
    fn preloaded_data_with_bad_params_is_a_strategy_error() {
        let opts = LoadOptions {
            start: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2021, 12, 31).unwrap(),
        };
        let loaded = load_panel(&["AAA".into()], &source(), &opts).unwrap();
        let err = run_backtest_from_data(
            &config(
                r#"type = "ma_crossover"
short_window = 0
long_window = 10"#,
            ),
            loaded,
        )
        .unwrap_err();
        assert!(matches!(err, RunError::Strategy(_)));
    }

    /// Shared buffer the fmt layer writes log lines into.
    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn completion_log_carries_all_six_stats() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            run_single_backtest(
                &config(r#"type = "buy_and_hold""#),
                &["AAA".into(), "BBB".into()],
                &source(),
            )
            .unwrap();
        });

        let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let line = logs
            .lines()
            .find(|l| l.contains("run complete"))
            .expect("run complete line");
        for field in [
            "total_return=",
            "annualized_return=",
            "annualized_volatility=",
            "sharpe=",
            "sortino=",
            "max_drawdown=",
        ] {
            assert!(line.contains(field), "{field} missing from: {line}");
        }
        assert!(logs
            .lines()
            .any(|l| l.contains("starting backtest") && l.contains("warmup=0")));
    }
}
