//! Strategy factory — build a strategy from its serialized config.

use super::ma_crossover::{DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW};
use super::{BuyAndHold, HoldSignal, MaCrossover, Strategy, StrategyError};
use serde::{Deserialize, Serialize};

/// Serializable strategy selection.
///
/// ```toml
/// [strategy]
/// type = "ma_crossover"
/// short_window = 40
/// long_window = 100
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Short/long trailing-mean comparison.
    MaCrossover {
        #[serde(default = "default_short_window")]
        short_window: usize,
        #[serde(default = "default_long_window")]
        long_window: usize,
    },

    /// Always long.
    BuyAndHold,

    /// Never trades.
    Hold,
}

fn default_short_window() -> usize {
    DEFAULT_SHORT_WINDOW
}

fn default_long_window() -> usize {
    DEFAULT_LONG_WINDOW
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig::MaCrossover {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
        }
    }
}

impl StrategyConfig {
    /// Type tag as written in config files.
    pub fn type_name(&self) -> &'static str {
        match self {
            StrategyConfig::MaCrossover { .. } => "ma_crossover",
            StrategyConfig::BuyAndHold => "buy_and_hold",
            StrategyConfig::Hold => "hold",
        }
    }
}

/// Construct a boxed strategy, validating its parameters.
pub fn build_strategy(config: &StrategyConfig) -> Result<Box<dyn Strategy>, StrategyError> {
    let strategy: Box<dyn Strategy> = match *config {
        StrategyConfig::MaCrossover {
            short_window,
            long_window,
        } => Box::new(MaCrossover::new(short_window, long_window)?),
        StrategyConfig::BuyAndHold => Box::new(BuyAndHold::new()),
        StrategyConfig::Hold => Box::new(HoldSignal::new()),
    };
    Ok(strategy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_each_variant() {
        for config in [
            StrategyConfig::default(),
            StrategyConfig::BuyAndHold,
            StrategyConfig::Hold,
        ] {
            let strategy = build_strategy(&config).unwrap();
            assert_eq!(strategy.name(), config.type_name());
        }
    }

    #[test]
    fn invalid_windows_fail_to_build() {
        let config = StrategyConfig::MaCrossover {
            short_window: 50,
            long_window: 20,
        };
        assert!(matches!(
            build_strategy(&config),
            Err(StrategyError::InvalidParams { .. })
        ));
    }

    #[test]
    fn config_roundtrips_through_json_with_defaults() {
        let config: StrategyConfig = serde_json::from_str(r#"{"type":"ma_crossover"}"#).unwrap();
        assert_eq!(config, StrategyConfig::default());

        let json = serde_json::to_string(&StrategyConfig::Hold).unwrap();
        assert_eq!(json, r#"{"type":"hold"}"#);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let result: Result<StrategyConfig, _> = serde_json::from_str(r#"{"type":"rsi"}"#);
        assert!(result.is_err());
    }
}
