//! Trade — a completed round-trip record (§3, §8 property #3).

use super::position::{ClosingReason, PositionSide};
use crate::money::Price;
use crate::time::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A closed round-trip trade: entry leg, exit leg, and the PnL derived from
/// them. Invariant (§8 property #3): `net_pnl = gross_pnl - entry_commission
/// - exit_commission`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: String,
    pub side: PositionSide,

    pub entry_time: Timestamp,
    pub entry_price: Price,
    pub entry_commission: Price,

    pub exit_time: Timestamp,
    pub exit_price: Price,
    pub exit_commission: Price,
    pub closing_reason: ClosingReason,

    pub quantity: Decimal,

    pub gross_pnl: Price,
    pub net_pnl: Price,

    /// Dollar cost of the exit leg's slippage; the entry leg's is already
    /// baked into `entry_price`.
    pub slippage: Price,
    pub duration_seconds: i64,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.net_pnl > Decimal::ZERO
    }
}
