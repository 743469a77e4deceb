//! Price data: row sources, canonical indices, and the dense price panel.

pub mod csv_source;
pub mod index;
pub mod panel;
pub mod provider;
pub mod universe;

pub use csv_source::CsvPriceSource;
pub use index::{AssetIndex, DateIndex};
pub use panel::{build_panel, PanelContext, PricePanel, ValidityMask};
pub use provider::{parse_date, DataError, InMemorySource, PriceRow, PriceSource};
pub use universe::{load_assets_file, parse_assets};
