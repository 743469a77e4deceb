//! AlphaLab CLI — run a backtest from a strategy config, assets file, and price CSV.
//!
//! Commands:
//! - `run` — simulate a strategy over a universe and print its statistics
//! - `check-config` — parse and validate a config file without running

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use alphalab_core::data::{load_assets_file, CsvPriceSource};
use alphalab_runner::runner::run_single_backtest;
use alphalab_runner::{format_summary, save_artifacts, BacktestConfig};

#[derive(Parser)]
#[command(name = "alphalab", about = "AlphaLab CLI — daily alpha backtesting harness")]
struct Cli {
    /// Log level filter (overridden by RUST_LOG).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a backtest and print its statistics.
    Run {
        /// Path to the strategy config TOML.
        #[arg(long)]
        config: PathBuf,

        /// Assets file: one symbol per line.
        #[arg(long)]
        assets: PathBuf,

        /// Price CSV with columns date,symbol,open,high,low,close,volume.
        #[arg(long)]
        data: PathBuf,

        /// Override the config start date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Override the config end date (YYYY-MM-DD).
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Override the starting capital.
        #[arg(long)]
        initial_capital: Option<f64>,

        /// Override the proportional commission rate.
        #[arg(long)]
        commission_pct: Option<f64>,

        /// Override the flat commission fee.
        #[arg(long)]
        commission_fixed: Option<f64>,

        /// Write result.json, equity.csv and trades.csv here.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Parse and validate a config file.
    CheckConfig {
        /// Path to the strategy config TOML.
        #[arg(long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
struct Overrides {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    initial_capital: Option<f64>,
    commission_pct: Option<f64>,
    commission_fixed: Option<f64>,
}

impl Overrides {
    fn apply(&self, config: &mut BacktestConfig) {
        let b = &mut config.backtest;
        if let Some(start) = self.start {
            b.start_date = start;
        }
        if let Some(end) = self.end {
            b.end_date = end;
        }
        if let Some(capital) = self.initial_capital {
            b.initial_capital = capital;
        }
        if let Some(pct) = self.commission_pct {
            b.commission_pct = pct;
        }
        if let Some(fixed) = self.commission_fixed {
            b.commission_fixed = fixed;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Run {
            config,
            assets,
            data,
            start,
            end,
            initial_capital,
            commission_pct,
            commission_fixed,
            output_dir,
        } => {
            let overrides = Overrides {
                start,
                end,
                initial_capital,
                commission_pct,
                commission_fixed,
            };
            run_cmd(&config, &assets, &data, &overrides, output_dir.as_deref())
        }
        Commands::CheckConfig { config } => check_config_cmd(&config),
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to init logging: {e}"))
}

fn run_cmd(
    config_path: &Path,
    assets_path: &Path,
    data_path: &Path,
    overrides: &Overrides,
    output_dir: Option<&Path>,
) -> Result<()> {
    let mut config = BacktestConfig::from_file(config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    overrides.apply(&mut config);

    let assets = load_assets_file(assets_path)
        .with_context(|| format!("loading assets {}", assets_path.display()))?;
    let source = CsvPriceSource::new(data_path);

    let result = run_single_backtest(&config, &assets, &source)?;

    print!("{}", format_summary(&result));

    if let Some(dir) = output_dir {
        save_artifacts(&result, dir)?;
        info!(dir = %dir.display(), "artifacts saved");
    }

    Ok(())
}

fn check_config_cmd(config_path: &Path) -> Result<()> {
    let config = BacktestConfig::from_file(config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    println!(
        "{}: {} from {} to {} (run id {})",
        config_path.display(),
        config.strategy.type_name(),
        config.backtest.start_date,
        config.backtest.end_date,
        config.run_id()
    );
    Ok(())
}
