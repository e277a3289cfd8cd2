//! GeneratedSignal and its typed metadata (§3, §4.6, §9 "dynamic metadata typing").

use super::pattern::PatternKind;
use crate::money::{Price, Ratio};
use crate::time::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalType {
    Long,
    Short,
    ExitLong,
    ExitShort,
}

/// Strongly typed replacement for the stringified-number metadata dictionary
/// described in §9: stop, target, confidence, pattern kinds, and zone ids are
/// first-class fields; `extras` preserves any unrecognized string key so
/// upstream producers are never silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalMetadata {
    pub stop: Price,
    pub target: Price,
    pub confidence: Ratio,
    pub confluence_count: u32,
    pub pattern_kinds: Vec<PatternKind>,
    pub zone_ids: Vec<String>,
    pub extras: HashMap<String, String>,
}

impl SignalMetadata {
    /// Parse a ranking component out of `extras`, defaulting to 0 on a
    /// missing or malformed value (§4.7.2 step 5: "parsed defensively").
    pub fn extra_component(&self, key: &str) -> Decimal {
        self.extras
            .get(key)
            .and_then(|raw| raw.parse::<Decimal>().ok())
            .unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSignal {
    pub symbol: String,
    pub timestamp: Timestamp,
    pub signal_type: SignalType,
    pub entry_price: Price,
    pub stop_loss: Price,
    pub take_profit: Price,
    pub confidence: Ratio,
    pub signal_strength: Ratio,
    pub metadata: SignalMetadata,
}
