//! Alignment scoring between HTF and trading-timeframe state (§4.5 step 5).

use crate::domain::{AlignmentType, MarketState, StatePoint, TimeframeAlignment, TrendDirection};
use crate::money::clamp01;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compatibility {
    High,
    Mixed,
    Clashing,
}

fn state_compatibility(htf: &StatePoint, trading: &StatePoint) -> Compatibility {
    let both_trend_same_direction = htf.state == MarketState::Trend
        && trading.state == MarketState::Trend
        && htf.trend_direction == trading.trend_direction
        && htf.trend_direction != TrendDirection::Neutral;
    let trading_exits_into_htf_trend =
        trading.state == MarketState::CongestionExit && trading.trend_direction == htf.trend_direction;

    if both_trend_same_direction || trading_exits_into_htf_trend {
        return Compatibility::High;
    }

    let directly_opposed = htf.trend_direction != TrendDirection::Neutral
        && trading.trend_direction != TrendDirection::Neutral
        && htf.trend_direction != trading.trend_direction
        && htf.state == MarketState::Trend
        && trading.state == MarketState::Trend;
    if directly_opposed {
        return Compatibility::Clashing;
    }

    Compatibility::Mixed
}

/// Compute the §4.5 step 5 alignment score and resulting `TimeframeAlignment`.
pub fn compute_alignment(
    htf_trend: TrendDirection,
    trading_trend: TrendDirection,
    htf_state: &StatePoint,
    trading_state: &StatePoint,
) -> TimeframeAlignment {
    let direction_term = if htf_trend == trading_trend && htf_trend != TrendDirection::Neutral {
        dec!(0.5)
    } else if htf_trend == TrendDirection::Neutral || trading_trend == TrendDirection::Neutral {
        dec!(0.25)
    } else {
        dec!(0)
    };

    let state_term = match state_compatibility(htf_state, trading_state) {
        Compatibility::High => dec!(0.2),
        Compatibility::Mixed => dec!(0.1),
        Compatibility::Clashing => dec!(0),
    };

    let confidence_term = dec!(0.3) * (htf_state.confidence + trading_state.confidence) / dec!(2);

    let score = clamp01(direction_term + state_term + confidence_term);
    let alignment_type = AlignmentType::from_score(score);

    let opposes = htf_trend != TrendDirection::Neutral
        && trading_trend != TrendDirection::Neutral
        && htf_trend != trading_trend;
    let trade_permitted = matches!(alignment_type, AlignmentType::Perfect | AlignmentType::Partial)
        && htf_trend != TrendDirection::Neutral
        && !opposes;

    TimeframeAlignment {
        alignment_type,
        score,
        trade_permitted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::domain::SlopeTrend;

    fn state(state: MarketState, direction: TrendDirection, confidence: Decimal) -> StatePoint {
        StatePoint {
            timestamp: Utc.timestamp_opt(0, 0).unwrap(),
            state,
            trend_direction: direction,
            bars_in_state: 3,
            previous_state: None,
            pldot_slope_trend: SlopeTrend::Horizontal,
            confidence,
            reason: String::new(),
        }
    }

    #[test]
    fn agreeing_trends_with_high_confidence_is_perfect() {
        let htf = state(MarketState::Trend, TrendDirection::Up, dec!(0.9));
        let trading = state(MarketState::Trend, TrendDirection::Up, dec!(0.9));
        let alignment = compute_alignment(TrendDirection::Up, TrendDirection::Up, &htf, &trading);
        assert_eq!(alignment.alignment_type, AlignmentType::Perfect);
        assert!(alignment.trade_permitted);
    }

    #[test]
    fn opposing_trends_are_conflicting_and_block_trading() {
        let htf = state(MarketState::Trend, TrendDirection::Up, dec!(0.9));
        let trading = state(MarketState::Trend, TrendDirection::Down, dec!(0.9));
        let alignment = compute_alignment(TrendDirection::Up, TrendDirection::Down, &htf, &trading);
        assert_eq!(alignment.alignment_type, AlignmentType::Conflicting);
        assert!(!alignment.trade_permitted);
    }

    #[test]
    fn neutral_htf_blocks_trading_even_with_decent_score() {
        let htf = state(MarketState::CongestionAction, TrendDirection::Neutral, dec!(0.8));
        let trading = state(MarketState::CongestionExit, TrendDirection::Neutral, dec!(0.8));
        let alignment = compute_alignment(TrendDirection::Neutral, TrendDirection::Neutral, &htf, &trading);
        assert!(!alignment.trade_permitted);
    }
}
