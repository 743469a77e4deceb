//! Executed trade events.

use super::ids::{AssetId, DateId};
use serde::{Deserialize, Serialize};

/// Direction of an executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

/// One all-or-nothing fill against an asset's ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub date_id: DateId,
    pub asset_id: AssetId,
    pub side: TradeSide,
    pub price: f64,
    pub shares: f64,
    pub commission: f64,
}

impl TradeEvent {
    /// Notional value of the fill before commission.
    pub fn notional(&self) -> f64 {
        self.price * self.shares
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notional_is_price_times_shares() {
        let trade = TradeEvent {
            date_id: 3,
            asset_id: 0,
            side: TradeSide::Sell,
            price: 105.0,
            shares: 2.0,
            commission: 1.0,
        };
        assert_eq!(trade.notional(), 210.0);
    }

    #[test]
    fn side_serializes_lowercase() {
        let json = serde_json::to_string(&TradeSide::Buy).unwrap();
        assert_eq!(json, "\"buy\"");
        assert_eq!(TradeSide::Sell.as_str(), "sell");
    }
}
