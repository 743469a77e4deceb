//! Serializable backtest configuration.
//!
//! Loaded from a TOML file:
//!
//! ```toml
//! [backtest]
//! start_date = "2021-01-01"
//! end_date = "2021-12-31"
//! initial_capital = 10000.0
//! commission_pct = 0.001
//! commission_fixed = 1.0
//!
//! [strategy]
//! type = "ma_crossover"
//! short_window = 40
//! long_window = 100
//! ```

use alphalab_core::engine::commission::{DEFAULT_COMMISSION_FIXED, DEFAULT_COMMISSION_PCT};
use alphalab_core::engine::state::DEFAULT_INITIAL_CAPITAL;
use alphalab_core::engine::{CommissionSchedule, EngineConfig, EngineError};
use alphalab_core::strategy::StrategyConfig;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

/// Errors from loading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("start_date {start} is after end_date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Complete configuration for one backtest run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestConfig {
    pub backtest: BacktestSection,
    #[serde(default)]
    pub strategy: StrategyConfig,
}

/// The `[backtest]` table: simulation range and account settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestSection {
    /// Simulation start date (inclusive).
    pub start_date: NaiveDate,

    /// Simulation end date (inclusive).
    pub end_date: NaiveDate,

    #[serde(default = "default_initial_capital")]
    pub initial_capital: f64,

    #[serde(default = "default_commission_pct")]
    pub commission_pct: f64,

    #[serde(default = "default_commission_fixed")]
    pub commission_fixed: f64,
}

fn default_initial_capital() -> f64 {
    DEFAULT_INITIAL_CAPITAL
}

fn default_commission_pct() -> f64 {
    DEFAULT_COMMISSION_PCT
}

fn default_commission_fixed() -> f64 {
    DEFAULT_COMMISSION_FIXED
}

impl BacktestConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate config TOML.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the date range and account settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.backtest;
        if b.start_date > b.end_date {
            return Err(ConfigError::InvalidDateRange {
                start: b.start_date,
                end: b.end_date,
            });
        }
        self.engine_config().validate()?;
        Ok(())
    }

    /// Engine settings derived from the `[backtest]` table.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(
            self.backtest.initial_capital,
            CommissionSchedule::new(self.backtest.commission_fixed, self.backtest.commission_pct),
        )
    }

    /// Deterministic hash of this config (BLAKE3 over its JSON form).
    ///
    /// Two runs with identical configs share a RunId.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
