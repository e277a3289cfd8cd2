//! PortfolioSnapshot — one point of the equity curve (§3, §8 property #2).

use crate::money::Price;
use crate::time::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One point of the equity curve. Invariant (§8 property #2): `equity =
/// cash + sum(positions_value)`, within one unit of `price_rounding`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub timestamp: Timestamp,
    pub cash: Price,
    pub positions_value: Price,
    pub equity: Price,
    pub drawdown_from_peak: Decimal,
}

impl PortfolioSnapshot {
    pub fn new(timestamp: Timestamp, cash: Price, positions_value: Price, peak_equity: Price) -> Self {
        let equity = cash + positions_value;
        let drawdown_from_peak = if peak_equity > Decimal::ZERO {
            ((peak_equity - equity) / peak_equity).max(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };
        Self {
            timestamp,
            cash,
            positions_value,
            equity,
            drawdown_from_peak,
        }
    }
}
