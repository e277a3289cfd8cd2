//! StatePoint — the five-state market classification (§3, §4.3).

use crate::time::Timestamp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Five-state market classification. Deliberately a tagged enum rather than
/// independent boolean flags — two states can never simultaneously be true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketState {
    Trend,
    CongestionEntrance,
    CongestionAction,
    CongestionExit,
    Reversal,
}

impl MarketState {
    pub fn is_congestion_family(self) -> bool {
        matches!(
            self,
            MarketState::CongestionEntrance
                | MarketState::CongestionAction
                | MarketState::CongestionExit
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

impl TrendDirection {
    pub fn opposite(self) -> Self {
        match self {
            TrendDirection::Up => TrendDirection::Down,
            TrendDirection::Down => TrendDirection::Up,
            TrendDirection::Neutral => TrendDirection::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlopeTrend {
    Rising,
    Falling,
    Horizontal,
}

/// Configuration for the market-state classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketStateConfig {
    pub slope_threshold: Decimal,
}

impl Default for MarketStateConfig {
    fn default() -> Self {
        Self {
            slope_threshold: dec!(0.0001),
        }
    }
}

/// One point of the state series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatePoint {
    pub timestamp: Timestamp,
    pub state: MarketState,
    pub trend_direction: TrendDirection,
    pub bars_in_state: u32,
    pub previous_state: Option<MarketState>,
    pub pldot_slope_trend: SlopeTrend,
    pub confidence: Decimal,
    pub reason: String,
}
