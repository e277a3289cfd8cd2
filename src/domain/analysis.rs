//! MultiTimeframeAnalysis — the coordinator's output (§3, §4.5).

use super::alignment::TimeframeAlignment;
use super::confluence::ConfluenceZone;
use super::state::TrendDirection;
use crate::money::{Price, Ratio};
use serde::{Deserialize, Serialize};

/// Where the trading-timeframe close sits relative to the projected HTF
/// PLdot level (§4.5 step 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HtfPosition {
    AboveHtf,
    BelowHtf,
    AtHtf,
}

/// Tolerance band for "at HTF" classification, expressed as a fraction
/// (0.001 = 0.1%). The source leaves this implicit; SPEC_FULL.md fixes a
/// default here rather than guessing silently at each call site.
pub const DEFAULT_HTF_TOLERANCE_PCT: &str = "0.001";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PldotOverlay {
    pub htf_pldot: Price,
    pub distance_pct: Ratio,
    pub position: HtfPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendedAction {
    Long,
    Short,
    Wait,
    Reduce,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiTimeframeAnalysis {
    pub htf_trend: TrendDirection,
    pub htf_strength: Ratio,
    pub trading_trend: TrendDirection,
    pub alignment: TimeframeAlignment,
    pub pldot_overlay: PldotOverlay,
    pub confluence_zones: Vec<ConfluenceZone>,
    pub pattern_confluence: bool,
    pub signal_strength: Ratio,
    pub risk_level: RiskLevel,
    pub recommended_action: RecommendedAction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_htf_tolerance_parses_as_decimal() {
        let tolerance: rust_decimal::Decimal = DEFAULT_HTF_TOLERANCE_PCT.parse().unwrap();
        assert_eq!(tolerance, rust_decimal_macros::dec!(0.001));
    }
}
