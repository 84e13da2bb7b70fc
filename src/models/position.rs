//! Position state supplied by the caller's price/position feed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Side;

/// Current holdings as the risk schedule sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PositionState {
    /// Signed net position in lots (positive long, negative short)
    pub net_lots: Decimal,

    /// Price the current trade started at
    #[serde(default)]
    pub entry_price: Option<Decimal>,

    /// PnL already realized within the trade
    #[serde(default)]
    pub realized_pnl: Decimal,
}

impl PositionState {
    pub fn flat() -> Self {
        Self::default()
    }

    pub fn new(net_lots: Decimal, entry_price: Decimal) -> Self {
        Self {
            net_lots,
            entry_price: Some(entry_price),
            realized_pnl: Decimal::ZERO,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.net_lots.is_zero()
    }

    pub fn side(&self) -> Option<Side> {
        Side::from_risk(self.net_lots)
    }

    /// Signed risk of the position for a given lot size.
    pub fn risk(&self, lot_size: Decimal) -> Decimal {
        self.net_lots * lot_size
    }
}
