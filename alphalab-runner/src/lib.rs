//! AlphaLab Runner — backtest orchestration, statistics, and export.
//!
//! This crate builds on `alphalab-core` to provide:
//! - TOML configuration with validation and a content-addressed run id
//! - Data loading from any `PriceSource` into a panel context
//! - Single-backtest runner producing a `BacktestResult`
//! - Performance statistics over the portfolio value series
//! - JSON/CSV artifacts and a text summary

pub mod config;
pub mod data_loader;
pub mod export;
pub mod metrics;
pub mod runner;

pub use config::{BacktestConfig, BacktestSection, ConfigError, RunId};
pub use data_loader::{load_panel, LoadError, LoadOptions, LoadedData};
pub use export::{format_summary, save_artifacts};
pub use metrics::PerformanceStats;
pub use runner::{run_backtest_from_data, run_single_backtest, BacktestResult, RunError};
