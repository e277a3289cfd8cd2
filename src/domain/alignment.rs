//! TimeframeAlignment — the coordinator's agreement score between timeframes (§3, §4.5 step 5).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlignmentType {
    Perfect,
    Partial,
    Divergent,
    Conflicting,
}

impl AlignmentType {
    /// Bucket a [0,1] alignment score per §4.5 step 5's thresholds.
    pub fn from_score(score: Decimal) -> Self {
        if score >= dec!(0.8) {
            AlignmentType::Perfect
        } else if score >= dec!(0.6) {
            AlignmentType::Partial
        } else if score >= dec!(0.3) {
            AlignmentType::Divergent
        } else {
            AlignmentType::Conflicting
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeframeAlignment {
    pub alignment_type: AlignmentType,
    pub score: Decimal,
    pub trade_permitted: bool,
}
