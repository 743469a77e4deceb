//! Reporting and export — JSON and CSV artifacts plus a text summary.
//!
//! A run directory holds:
//! - `result.json` — the full `BacktestResult`, with `schema_version`
//! - `equity.csv` — date, portfolio value, and daily return per simulated date
//! - `trades.csv` — one row per executed buy or sell
//!
//! Undefined values (NaN) are written as `null` in JSON and as empty cells in CSV.

use std::path::Path;

use anyhow::{Context, Result};

use crate::runner::BacktestResult;

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `BacktestResult` to pretty JSON.
pub fn export_json(result: &BacktestResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize BacktestResult to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the portfolio value series.
///
/// Columns: date, portfolio_value, daily_return
pub fn export_equity_csv(result: &BacktestResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "portfolio_value", "daily_return"])?;

    for (i, value) in result.portfolio_values.iter().enumerate() {
        let date = result
            .dates
            .get(i)
            .map(|d| d.to_string())
            .unwrap_or_default();
        let ret = result.daily_returns.get(i).copied().unwrap_or(f64::NAN);
        wtr.write_record([date, format_value(*value, 2), format_value(ret, 6)])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the trade log.
///
/// Columns: date, symbol, side, price, shares, commission
pub fn export_trades_csv(result: &BacktestResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "symbol", "side", "price", "shares", "commission"])?;

    for t in &result.trades {
        let (date, symbol) = result.resolve_trade(t);
        wtr.write_record([
            date.map(|d| d.to_string()).unwrap_or_default(),
            symbol.unwrap_or("").to_string(),
            t.side.as_str().to_string(),
            format!("{:.6}", t.price),
            format!("{:.6}", t.shares),
            format!("{:.2}", t.commission),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

fn format_value(v: f64, decimals: usize) -> String {
    if v.is_finite() {
        format!("{v:.decimals$}")
    } else if v.is_nan() {
        String::new()
    } else {
        v.to_string()
    }
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Write `result.json`, `equity.csv`, and `trades.csv` into `output_dir`,
/// creating it if needed.
pub fn save_artifacts(result: &BacktestResult, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let json = export_json(result)?;
    write_file(&output_dir.join("result.json"), &json)?;

    let equity_csv = export_equity_csv(result)?;
    write_file(&output_dir.join("equity.csv"), &equity_csv)?;

    let trades_csv = export_trades_csv(result)?;
    write_file(&output_dir.join("trades.csv"), &trades_csv)?;

    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

// ─── Text summary ───────────────────────────────────────────────────

/// Human-readable stats summary, three decimals per figure.
pub fn format_summary(result: &BacktestResult) -> String {
    let s = &result.stats;
    let period = match (result.dates.first(), result.dates.last()) {
        (Some(first), Some(last)) => format!("{first} to {last}"),
        _ => "no dates".to_string(),
    };

    let mut out = String::with_capacity(512);
    out.push_str(&format!(
        "Strategy:              {}\n",
        result.strategy.type_name()
    ));
    out.push_str(&format!("Run id:                {}\n", result.run_id));
    out.push_str(&format!("Assets:                {}\n", result.assets.join(", ")));
    out.push_str(&format!(
        "Period:                {period} ({} days)\n",
        result.dates.len()
    ));
    out.push_str(&format!("Trades:                {}\n", result.trades.len()));
    out.push_str(&format!(
        "Total commission:      {:.3}\n",
        result.total_commission
    ));
    out.push_str(&format!("Total return:          {:.3}\n", s.total_return));
    out.push_str(&format!("Annualized return:     {:.3}\n", s.annualized_return));
    out.push_str(&format!(
        "Annualized volatility: {:.3}\n",
        s.annualized_volatility
    ));
    out.push_str(&format!("Sharpe ratio:          {:.3}\n", s.sharpe_ratio));
    out.push_str(&format!("Sortino ratio:         {:.3}\n", s.sortino_ratio));
    out.push_str(&format!("Max drawdown:          {:.3}\n", s.max_drawdown));
    out
}
