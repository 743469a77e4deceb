//! End-to-end runner tests over file fixtures.
//!
//! Writes a price CSV, an assets file, and a config TOML into a temp dir,
//! then drives the same path the CLI uses: load config, load assets,
//! fetch from the CSV source, run, export.

use alphalab_core::data::{load_assets_file, CsvPriceSource};
use alphalab_core::domain::TradeSide;
use alphalab_runner::config::BacktestConfig;
use alphalab_runner::export::{format_summary, save_artifacts};
use alphalab_runner::runner::{run_single_backtest, BacktestResult};
use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::Path;
use tempfile::TempDir;

const N_DAYS: usize = 200;
const GAP: std::ops::Range<usize> = 60..65;

fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap() + chrono::Duration::days(i as i64)
}

/// AAA oscillates, BBB rises steadily with a five-day gap.
fn write_prices(path: &Path) {
    let mut csv = String::from("date,symbol,open,high,low,close,volume\n");
    for i in 0..N_DAYS {
        let aaa = 100.0 + 20.0 * (i as f64 / 15.0).sin();
        writeln!(csv, "{},AAA,{aaa},{aaa},{aaa},{aaa},1000", day(i)).unwrap();
        if !GAP.contains(&i) {
            let bbb = 50.0 + 0.5 * i as f64;
            writeln!(csv, "{},BBB,{bbb},{bbb},{bbb},{bbb},500", day(i)).unwrap();
        }
    }
    std::fs::write(path, csv).unwrap();
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        write_prices(&dir.path().join("prices.csv"));
        std::fs::write(
            dir.path().join("assets.txt"),
            "# universe\nAAA\n\nBBB\nAAA\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            r#"
[backtest]
start_date = "2021-01-01"
end_date = "2021-12-31"
initial_capital = 10000.0
commission_pct = 0.001
commission_fixed = 1.0

[strategy]
type = "ma_crossover"
short_window = 5
long_window = 20
"#,
        )
        .unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self) -> BacktestResult {
        let config = BacktestConfig::from_file(&self.path("config.toml")).unwrap();
        let assets = load_assets_file(&self.path("assets.txt")).unwrap();
        let source = CsvPriceSource::new(self.path("prices.csv"));
        run_single_backtest(&config, &assets, &source).unwrap()
    }
}

#[test]
fn series_covers_every_date() {
    let result = Fixture::new().run();
    assert_eq!(result.assets, vec!["AAA".to_string(), "BBB".to_string()]);
    assert_eq!(result.dates.len(), N_DAYS);
    assert_eq!(result.portfolio_values.len(), N_DAYS);
    assert_eq!(result.daily_returns.len(), N_DAYS);
    assert!(result
        .portfolio_values
        .iter()
        .all(|v| v.is_finite() && *v > 0.0));
    assert!((result.void_rates["BBB"] - 0.025).abs() < 1e-12);
    assert_eq!(result.void_rates["AAA"], 0.0);
}

#[test]
fn trades_alternate_and_start_with_buy() {
    let result = Fixture::new().run();
    for asset_id in 0..result.assets.len() {
        let sides: Vec<TradeSide> = result
            .trades
            .iter()
            .filter(|t| t.asset_id == asset_id)
            .map(|t| t.side)
            .collect();
        assert_eq!(sides.first(), Some(&TradeSide::Buy));
        for pair in sides.windows(2) {
            assert_ne!(pair[0], pair[1], "asset {asset_id} traded the same side twice");
        }
    }
    assert!(result
        .trades
        .iter()
        .any(|t| t.asset_id == 0 && t.side == TradeSide::Sell));
}

#[test]
fn rising_asset_buys_once_after_warmup_and_never_in_gap() {
    let result = Fixture::new().run();
    let bbb: Vec<_> = result.trades.iter().filter(|t| t.asset_id == 1).collect();
    assert_eq!(bbb.len(), 1);
    assert_eq!(bbb[0].date_id, 20);
    assert_eq!(bbb[0].side, TradeSide::Buy);
    assert!(result.trades.iter().all(|t| !(t.asset_id == 1 && GAP.contains(&t.date_id))));
}

#[test]
fn identical_inputs_give_identical_runs() {
    let fixture = Fixture::new();
    let a = fixture.run();
    let b = fixture.run();
    assert_eq!(a.run_id, b.run_id);
    assert_eq!(a.portfolio_values, b.portfolio_values);
    assert_eq!(a.trades, b.trades);
}

#[test]
fn artifacts_and_summary_are_written() {
    let fixture = Fixture::new();
    let result = fixture.run();
    let out = fixture.path("out");
    save_artifacts(&result, &out).unwrap();

    let equity = std::fs::read_to_string(out.join("equity.csv")).unwrap();
    assert_eq!(equity.lines().count(), N_DAYS + 1);
    let trades = std::fs::read_to_string(out.join("trades.csv")).unwrap();
    assert_eq!(trades.lines().count(), result.trades.len() + 1);
    assert!(trades.contains(",BBB,buy,"));

    let json = std::fs::read_to_string(out.join("result.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["run_id"], result.run_id.as_str());

    let summary = format_summary(&result);
    assert!(summary.contains("ma_crossover"));
    assert!(summary.contains("Sharpe ratio"));
}

#[test]
fn range_without_data_gives_empty_series_and_nan_stats() {
    let fixture = Fixture::new();
    let mut config = BacktestConfig::from_file(&fixture.path("config.toml")).unwrap();
    config.backtest.start_date = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
    config.backtest.end_date = NaiveDate::from_ymd_opt(2030, 12, 31).unwrap();
    let source = CsvPriceSource::new(fixture.path("prices.csv"));

    let result = run_single_backtest(&config, &["AAA".into()], &source).unwrap();
    assert!(result.portfolio_values.is_empty());
    assert!(result.stats.total_return.is_nan());
    assert!(result.stats.max_drawdown.is_nan());
}
