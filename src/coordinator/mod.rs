//! Multi-timeframe coordinator (§4.5): combines HTF, trading, and optional
//! LTF indicator bundles into one `MultiTimeframeAnalysis`.

pub mod alignment;
pub mod confluence;

use crate::domain::{
    AlignmentType, HtfPosition, MultiTimeframeAnalysis, PldotOverlay, RecommendedAction, RiskLevel, TimeframeData,
};
use crate::error::IndicatorError;
use crate::money::{clamp01, Ratio};
use confluence::Candidate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Coordinator tuning parameters. §9's open question on the "at HTF"
/// tolerance is resolved here with an explicit, documented default rather
/// than a silently hard-coded constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinatorConfig {
    pub htf_tolerance_pct: Decimal,
    pub confluence_tolerance_pct: Decimal,
    pub confluence_window: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            htf_tolerance_pct: dec!(0.001),
            confluence_tolerance_pct: dec!(0.005),
            confluence_window: 50,
        }
    }
}

/// Prior step's outcome for the same symbol/timeframe pair, used only to
/// detect the `Reduce` downgrade in step 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorOutcome {
    pub recommended_action: RecommendedAction,
    pub alignment_type: AlignmentType,
}

pub fn analyze(
    htf: &TimeframeData,
    trading: &TimeframeData,
    ltf: Option<&TimeframeData>,
    config: &CoordinatorConfig,
    prior: Option<PriorOutcome>,
) -> Result<MultiTimeframeAnalysis, IndicatorError> {
    let htf_state = htf
        .latest_state()
        .ok_or_else(|| IndicatorError::AlignmentError("HTF has no state series".to_string()))?;
    let trading_state = trading
        .latest_state()
        .ok_or_else(|| IndicatorError::AlignmentError("trading timeframe has no state series".to_string()))?;
    let trading_bar = trading
        .latest_bar()
        .ok_or_else(|| IndicatorError::AlignmentError("trading timeframe has no bars".to_string()))?;
    let htf_pldot = htf
        .latest_pldot()
        .ok_or_else(|| IndicatorError::AlignmentError("HTF has no PLdot series".to_string()))?;

    // 1. HTF trend
    let htf_trend = htf_state.trend_direction;
    let htf_strength = htf_state.confidence;

    // 2. Trading trend
    let trading_trend = trading_state.trend_direction;

    // 3. PLdot overlay
    let distance_pct = (trading_bar.close - htf_pldot.value) / htf_pldot.value;
    let position = if distance_pct.abs() <= config.htf_tolerance_pct {
        HtfPosition::AtHtf
    } else if distance_pct > Decimal::ZERO {
        HtfPosition::AboveHtf
    } else {
        HtfPosition::BelowHtf
    };
    let pldot_overlay = PldotOverlay {
        htf_pldot: htf_pldot.value,
        distance_pct,
        position,
    };

    // 4. Confluence zones
    let mut candidates = Vec::new();
    collect_candidates(htf, config.confluence_window, &mut candidates);
    collect_candidates(trading, config.confluence_window, &mut candidates);
    if let Some(ltf) = ltf {
        collect_candidates(ltf, config.confluence_window, &mut candidates);
    }
    let confluence_zones = confluence::cluster_confluence_zones(candidates, config.confluence_tolerance_pct, trading_bar.close);

    // 5. Alignment score
    let alignment_result = alignment::compute_alignment(htf_trend, trading_trend, htf_state, trading_state);

    // 6. Pattern confluence
    let pattern_confluence = has_pattern_confluence(htf, trading, config.confluence_window);

    // 7. Signal strength
    let nearest_zone_distance = confluence_zones
        .iter()
        .map(|z| (z.level - trading_bar.close).abs())
        .min();
    let trading_envelope_width = trading.latest_envelope().map(|e| e.width);
    let confluence_proximity = match (nearest_zone_distance, trading_envelope_width) {
        (Some(distance), Some(width)) if width > Decimal::ZERO => {
            clamp01(Decimal::ONE - distance / width)
        }
        _ => Decimal::ZERO,
    };
    let pattern_confluence_bonus = if pattern_confluence { Decimal::ONE } else { Decimal::ZERO };

    let signal_strength: Ratio = clamp01(
        dec!(0.4) * alignment_result.score
            + dec!(0.3) * htf_strength
            + dec!(0.15) * confluence_proximity
            + dec!(0.15) * pattern_confluence_bonus,
    );

    // 8. Risk level
    let risk_level = if alignment_result.alignment_type == AlignmentType::Perfect && htf_strength >= dec!(0.7) {
        RiskLevel::Low
    } else if matches!(alignment_result.alignment_type, AlignmentType::Divergent | AlignmentType::Conflicting)
        || htf_strength < dec!(0.4)
    {
        RiskLevel::High
    } else {
        RiskLevel::Medium
    };

    // 9. Recommended action
    let recommended_action = recommend_action(
        alignment_result.trade_permitted,
        htf_trend,
        signal_strength,
        alignment_result.alignment_type,
        prior,
    );

    Ok(MultiTimeframeAnalysis {
        htf_trend,
        htf_strength,
        trading_trend,
        alignment: alignment_result,
        pldot_overlay,
        confluence_zones,
        pattern_confluence,
        signal_strength,
        risk_level,
        recommended_action,
    })
}

fn collect_candidates(data: &TimeframeData, window: usize, out: &mut Vec<Candidate>) {
    let pldot_tail = tail(&data.pldot, window);
    out.extend(pldot_tail.iter().map(|p| Candidate {
        timeframe: data.timeframe,
        timestamp: p.timestamp,
        level: p.value,
    }));

    let envelope_tail = tail(&data.envelopes, window);
    for envelope in envelope_tail {
        out.push(Candidate {
            timeframe: data.timeframe,
            timestamp: envelope.timestamp,
            level: envelope.upper,
        });
        out.push(Candidate {
            timeframe: data.timeframe,
            timestamp: envelope.timestamp,
            level: envelope.lower,
        });
    }
}

fn tail<T>(series: &[T], window: usize) -> &[T] {
    if series.len() > window {
        &series[series.len() - window..]
    } else {
        series
    }
}

fn has_pattern_confluence(htf: &TimeframeData, trading: &TimeframeData, window: usize) -> bool {
    let Some(anchor) = trading.latest_bar().map(|b| b.timestamp) else {
        return false;
    };
    let window_start_idx = trading.bars.len().saturating_sub(window);
    let Some(window_start) = trading.bars.get(window_start_idx).map(|b| b.timestamp) else {
        return false;
    };

    let trading_recent: Vec<_> = trading
        .patterns
        .iter()
        .filter(|p| p.end_ts >= window_start && p.end_ts <= anchor)
        .collect();
    let htf_recent: Vec<_> = htf
        .patterns
        .iter()
        .filter(|p| p.end_ts >= window_start && p.end_ts <= anchor)
        .collect();

    htf_recent
        .iter()
        .any(|h| trading_recent.iter().any(|t| t.kind == h.kind && t.direction == h.direction))
}

fn recommend_action(
    trade_permitted: bool,
    htf_trend: crate::domain::TrendDirection,
    signal_strength: Ratio,
    alignment_type: AlignmentType,
    prior: Option<PriorOutcome>,
) -> RecommendedAction {
    use crate::domain::TrendDirection;

    if let Some(prior) = prior {
        let was_directional = matches!(prior.recommended_action, RecommendedAction::Long | RecommendedAction::Short);
        if was_directional && alignment_type == AlignmentType::Divergent && prior.alignment_type != AlignmentType::Divergent {
            return RecommendedAction::Reduce;
        }
    }

    if !trade_permitted || signal_strength < dec!(0.5) {
        return RecommendedAction::Wait;
    }
    match htf_trend {
        TrendDirection::Up => RecommendedAction::Long,
        TrendDirection::Down => RecommendedAction::Short,
        TrendDirection::Neutral => RecommendedAction::Wait,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bar, Classification, EnvelopeConfig, MarketStateConfig};
    use crate::indicators::build_timeframe_data;
    use crate::time::Interval;
    use chrono::{TimeZone, Utc};

    fn bar(i: i64, c: Decimal) -> Bar {
        Bar::new(
            Utc.timestamp_opt(1_700_000_000 + i * 3_600, 0).unwrap(),
            c - dec!(0.3),
            c + dec!(0.5),
            c - dec!(0.5),
            c,
            dec!(1000),
        )
        .unwrap()
    }

    fn uptrend(n: i64) -> Vec<Bar> {
        (0..n).map(|i| bar(i, dec!(100) + Decimal::from(i))).collect()
    }

    #[test]
    fn matching_uptrends_recommend_long() {
        let htf = build_timeframe_data(
            Interval::H4,
            Classification::Higher,
            uptrend(20),
            &EnvelopeConfig::default(),
            &MarketStateConfig::default(),
        )
        .unwrap();
        let trading = build_timeframe_data(
            Interval::H1,
            Classification::Trading,
            uptrend(20),
            &EnvelopeConfig::default(),
            &MarketStateConfig::default(),
        )
        .unwrap();

        let analysis = analyze(&htf, &trading, None, &CoordinatorConfig::default(), None).unwrap();
        assert_eq!(analysis.htf_trend, crate::domain::TrendDirection::Up);
        assert_eq!(analysis.recommended_action, RecommendedAction::Long);
    }

    #[test]
    fn opposing_trends_wait() {
        let htf = build_timeframe_data(
            Interval::H4,
            Classification::Higher,
            uptrend(20),
            &EnvelopeConfig::default(),
            &MarketStateConfig::default(),
        )
        .unwrap();
        let downtrend: Vec<Bar> = (0..20).map(|i| bar(i, dec!(120) - Decimal::from(i))).collect();
        let trading = build_timeframe_data(
            Interval::H1,
            Classification::Trading,
            downtrend,
            &EnvelopeConfig::default(),
            &MarketStateConfig::default(),
        )
        .unwrap();

        let analysis = analyze(&htf, &trading, None, &CoordinatorConfig::default(), None).unwrap();
        assert_eq!(analysis.recommended_action, RecommendedAction::Wait);
        assert!(!analysis.alignment.trade_permitted);
    }
}
