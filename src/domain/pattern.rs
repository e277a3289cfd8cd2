//! PatternEvent — emitted by the pattern detectors (§3, §4.4).

use crate::time::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternKind {
    PLdotPush,
    PLdotRefresh,
    Exhaust,
    CWave,
    CongestionOscillation,
}

/// Direction of a detected pattern: `-1`, `0`, or `+1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Direction(pub i8);

impl Direction {
    pub const DOWN: Direction = Direction(-1);
    pub const NEUTRAL: Direction = Direction(0);
    pub const UP: Direction = Direction(1);

    pub fn from_sign(value: Decimal) -> Self {
        if value > Decimal::ZERO {
            Direction::UP
        } else if value < Decimal::ZERO {
            Direction::DOWN
        } else {
            Direction::NEUTRAL
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternEvent {
    pub kind: PatternKind,
    pub direction: Direction,
    pub start_ts: Timestamp,
    pub end_ts: Timestamp,
    pub strength: Decimal,
    pub metadata: HashMap<String, String>,
}
