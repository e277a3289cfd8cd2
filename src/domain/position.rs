//! Position — an open holding in a single symbol (§3, §4.7.3).

use crate::error::EngineError;
use crate::money::{Price, Ratio};
use crate::time::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSide {
    Long,
    Short,
}

/// Per-position lifecycle state (§4.7.3): `Idle -> Pending(entry) -> Open ->
/// Closing(reason) -> Closed`. A tagged enum rather than independent flags —
/// a position can never be simultaneously `Open` and `Closing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionState {
    Idle,
    Pending,
    Open,
    Closing(ClosingReason),
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClosingReason {
    Stop,
    Target,
    Signal,
}

impl PositionState {
    /// Validate a transition per the §4.7.3 state machine. Returns the next
    /// state or an `InternalInvariant` error if the transition is illegal.
    pub fn transition(self, next: PositionState) -> Result<PositionState, EngineError> {
        let legal = matches!(
            (self, next),
            (PositionState::Idle, PositionState::Pending)
                | (PositionState::Pending, PositionState::Open)
                | (PositionState::Pending, PositionState::Idle)
                | (PositionState::Open, PositionState::Closing(_))
                | (PositionState::Closing(_), PositionState::Closed)
        );
        if legal {
            Ok(next)
        } else {
            Err(EngineError::InternalInvariant(format!(
                "illegal position transition {:?} -> {:?}",
                self, next
            )))
        }
    }
}

/// An open position in a single symbol.
///
/// Invariant: `quantity > 0`. If `stop_loss`/`take_profit` are set, they
/// satisfy the side-appropriate inequality with `entry_price` (longs:
/// `stop < entry < target`; shorts: symmetric).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub side: PositionSide,
    pub quantity: Decimal,
    pub entry_price: Price,
    pub entry_time: Timestamp,
    pub entry_commission: Price,
    pub stop_loss: Option<Price>,
    pub take_profit: Option<Price>,
    pub confidence: Option<Ratio>,
    pub notes: String,
    /// Lifecycle state, driven by `PositionManager::open`/`close` rather than
    /// set directly by callers. Construct with `PositionState::Idle`.
    pub state: PositionState,
}

impl Position {
    pub fn market_value(&self, price: Price) -> Price {
        self.quantity * price
    }

    pub fn unrealized_pnl(&self, price: Price) -> Price {
        match self.side {
            PositionSide::Long => (price - self.entry_price) * self.quantity,
            PositionSide::Short => (self.entry_price - price) * self.quantity,
        }
    }
}
