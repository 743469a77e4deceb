//! Dense `date × asset` price panel and its validity mask.
//!
//! Cells live in one row-major arena indexed by `(date_id, asset_id)`.
//! Missing observations are void cells (NaN prices) paired with `false` in
//! the mask. No forward-fill of tradable price data.

use super::index::{AssetIndex, DateIndex};
use super::provider::PriceRow;
use crate::domain::{AssetId, Cell, DateId};
use std::collections::HashMap;
use tracing::debug;

/// OHLCV cells for every (date, asset) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePanel {
    n_dates: usize,
    n_assets: usize,
    cells: Vec<Cell>,
}

impl PricePanel {
    pub fn n_dates(&self) -> usize {
        self.n_dates
    }

    pub fn n_assets(&self) -> usize {
        self.n_assets
    }

    /// Cell at `(date_id, asset_id)`. Panics if either id is out of range.
    pub fn cell(&self, date_id: DateId, asset_id: AssetId) -> &Cell {
        &self.cells[self.offset(date_id, asset_id)]
    }

    pub fn close(&self, date_id: DateId, asset_id: AssetId) -> f64 {
        self.cell(date_id, asset_id).close
    }

    /// All cells for one date, in asset id order.
    pub fn row(&self, date_id: DateId) -> &[Cell] {
        let start = date_id * self.n_assets;
        &self.cells[start..start + self.n_assets]
    }

    fn offset(&self, date_id: DateId, asset_id: AssetId) -> usize {
        assert!(
            date_id < self.n_dates && asset_id < self.n_assets,
            "panel index ({date_id}, {asset_id}) out of range ({} x {})",
            self.n_dates,
            self.n_assets
        );
        date_id * self.n_assets + asset_id
    }
}

/// Boolean mask with the same shape as the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidityMask {
    n_dates: usize,
    n_assets: usize,
    valid: Vec<bool>,
}

impl ValidityMask {
    pub fn n_dates(&self) -> usize {
        self.n_dates
    }

    pub fn n_assets(&self) -> usize {
        self.n_assets
    }

    /// Whether an observation exists at `(date_id, asset_id)`.
    /// Out-of-range ids are reported as invalid.
    pub fn is_valid(&self, date_id: DateId, asset_id: AssetId) -> bool {
        date_id < self.n_dates
            && asset_id < self.n_assets
            && self.valid[date_id * self.n_assets + asset_id]
    }

    pub fn all_valid(&self) -> bool {
        self.valid.iter().all(|v| *v)
    }

    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|v| **v).count()
    }

    /// Fraction of missing cells per asset, in asset id order.
    pub fn void_rates(&self) -> Vec<f64> {
        (0..self.n_assets)
            .map(|a| {
                if self.n_dates == 0 {
                    return 0.0;
                }
                let missing = (0..self.n_dates)
                    .filter(|&d| !self.valid[d * self.n_assets + a])
                    .count();
                missing as f64 / self.n_dates as f64
            })
            .collect()
    }
}

/// Build the panel and mask for `assets × dates` from flat rows.
///
/// Rows whose symbol or date is not in the indices are ignored. If several
/// rows share a (date, symbol) pair the first one wins. Empty indices yield
/// an empty panel, not an error.
pub fn build_panel(
    rows: &[PriceRow],
    assets: &AssetIndex,
    dates: &DateIndex,
) -> (PricePanel, ValidityMask) {
    let n_dates = dates.len();
    let n_assets = assets.len();
    let mut cells = vec![Cell::void(); n_dates * n_assets];
    let mut valid = vec![false; n_dates * n_assets];

    let asset_ids = assets.lookup();
    let date_ids: HashMap<_, DateId> = dates
        .dates()
        .iter()
        .enumerate()
        .map(|(i, d)| (*d, i))
        .collect();

    let mut duplicates = 0usize;
    for row in rows {
        let (Some(&a), Some(&d)) = (asset_ids.get(row.symbol.as_str()), date_ids.get(&row.date))
        else {
            continue;
        };
        let offset = d * n_assets + a;
        if valid[offset] {
            duplicates += 1;
            continue;
        }
        cells[offset] = Cell {
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        };
        valid[offset] = true;
    }

    if duplicates > 0 {
        debug!(duplicates, "duplicate (date, symbol) rows ignored");
    }

    (
        PricePanel {
            n_dates,
            n_assets,
            cells,
        },
        ValidityMask {
            n_dates,
            n_assets,
            valid,
        },
    )
}

/// Everything a strategy is initialized with: panel, mask, and both indices.
///
/// Shared read-only across the run behind an `Arc`.
#[derive(Debug, Clone)]
pub struct PanelContext {
    pub panel: PricePanel,
    pub valid: ValidityMask,
    pub assets: AssetIndex,
    pub dates: DateIndex,
}

impl PanelContext {
    /// Build the panel for `assets` over the dates present in `rows`.
    pub fn from_rows(rows: &[PriceRow], assets: AssetIndex) -> Self {
        let dates = DateIndex::from_rows(rows);
        Self::with_dates(rows, assets, dates)
    }

    /// Build the panel for an explicit date axis.
    pub fn with_dates(rows: &[PriceRow], assets: AssetIndex, dates: DateIndex) -> Self {
        let (panel, valid) = build_panel(rows, &assets, &dates);
        Self {
            panel,
            valid,
            assets,
            dates,
        }
    }

    pub fn n_dates(&self) -> usize {
        self.dates.len()
    }

    pub fn n_assets(&self) -> usize {
        self.assets.len()
    }

    pub fn is_valid(&self, date_id: DateId, asset_id: AssetId) -> bool {
        self.valid.is_valid(date_id, asset_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(date: &str, symbol: &str, close: f64) -> PriceRow {
        PriceRow {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            symbol: symbol.into(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn missing_rows_become_invalid_void_cells() {
        let rows = vec![
            row("2024-01-02", "SPY", 100.0),
            row("2024-01-03", "SPY", 101.0),
            row("2024-01-02", "QQQ", 200.0),
            // QQQ missing 2024-01-03
        ];
        let ctx = PanelContext::from_rows(&rows, AssetIndex::new(["SPY", "QQQ"]));

        assert_eq!(ctx.panel.n_dates(), 2);
        assert_eq!(ctx.panel.n_assets(), 2);
        assert!(ctx.is_valid(1, 0));
        assert_eq!(ctx.panel.close(1, 0), 101.0);
        assert!(!ctx.is_valid(1, 1));
        assert!(ctx.panel.close(1, 1).is_nan());
        assert_eq!(ctx.panel.cell(1, 1).volume, 0);
        assert_eq!(ctx.valid.void_rates(), vec![0.0, 0.5]);
    }

    #[test]
    fn gap_free_table_has_all_true_mask() {
        let rows = vec![
            row("2024-01-02", "A", 1.0),
            row("2024-01-02", "B", 2.0),
            row("2024-01-03", "B", 3.0),
            row("2024-01-03", "A", 4.0),
        ];
        let ctx = PanelContext::from_rows(&rows, AssetIndex::new(["A", "B"]));
        assert!(ctx.valid.all_valid());
        assert_eq!(ctx.valid.valid_count(), 4);
        assert_eq!(ctx.panel.close(1, 0), 4.0);
    }

    #[test]
    fn first_duplicate_row_wins() {
        let rows = vec![row("2024-01-02", "A", 1.0), row("2024-01-02", "A", 9.0)];
        let ctx = PanelContext::from_rows(&rows, AssetIndex::new(["A"]));
        assert_eq!(ctx.panel.close(0, 0), 1.0);
    }

    #[test]
    fn unknown_symbols_are_ignored() {
        let rows = vec![row("2024-01-02", "A", 1.0), row("2024-01-02", "Z", 9.0)];
        let ctx = PanelContext::from_rows(&rows, AssetIndex::new(["A"]));
        assert_eq!(ctx.n_assets(), 1);
        assert!(ctx.valid.all_valid());
    }

    #[test]
    fn empty_inputs_build_empty_panel() {
        let ctx = PanelContext::from_rows(&[], AssetIndex::new(["A", "B"]));
        assert_eq!(ctx.panel.n_dates(), 0);
        assert_eq!(ctx.panel.n_assets(), 2);

        let rows = vec![row("2024-01-02", "A", 1.0)];
        let ctx = PanelContext::from_rows(&rows, AssetIndex::default());
        assert_eq!(ctx.panel.n_assets(), 0);
        assert_eq!(ctx.panel.n_dates(), 1);
        assert!(ctx.panel.row(0).is_empty());
    }

    #[test]
    fn row_slices_by_date() {
        let rows = vec![row("2024-01-02", "A", 1.0), row("2024-01-02", "B", 2.0)];
        let ctx = PanelContext::from_rows(&rows, AssetIndex::new(["A", "B"]));
        let closes: Vec<f64> = ctx.panel.row(0).iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![1.0, 2.0]);
    }
}
