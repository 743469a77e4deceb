//! Domain types for AlphaLab

pub mod bar;
pub mod ids;
pub mod ledger;
pub mod trade;

pub use bar::Cell;
pub use ids::{AssetId, DateId};
pub use ledger::LedgerEntry;
pub use trade::{TradeEvent, TradeSide};
