//! Signal generator (§4.6): turns a `MultiTimeframeAnalysis` into at most
//! one `GeneratedSignal`. Deliberately kept as a separate function from the
//! coordinator (§9 "coordinator + generator coupling") so alignment logic
//! stays unit-testable without constructing a signal.

use crate::domain::{
    ConfluenceZone, GeneratedSignal, MultiTimeframeAnalysis, PositionSide, RecommendedAction, SignalMetadata,
    SignalType, TimeframeData, ZoneType,
};
use crate::indicators::atr_series;
use crate::money::Price;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalGeneratorConfig {
    pub atr_period: usize,
    pub stop_buffer_k: Decimal,
    pub reward_multiple: Decimal,
}

impl Default for SignalGeneratorConfig {
    fn default() -> Self {
        Self {
            atr_period: 14,
            stop_buffer_k: dec!(0.25),
            reward_multiple: dec!(2.0),
        }
    }
}

/// `held_side` tells the generator which side is currently open, needed to
/// resolve `Reduce` into a concrete `ExitLong`/`ExitShort` (§4.6). Absent
/// when the caller holds no position, in which case `Reduce` yields nothing.
pub fn generate_signal(
    analysis: &MultiTimeframeAnalysis,
    trading: &TimeframeData,
    held_side: Option<PositionSide>,
    config: &SignalGeneratorConfig,
) -> Option<GeneratedSignal> {
    let bar = trading.latest_bar()?;
    let timestamp = bar.timestamp;
    let symbol_entry_price = bar.close;

    match analysis.recommended_action {
        RecommendedAction::Wait => None,
        RecommendedAction::Reduce => {
            let side = held_side?;
            let signal_type = match side {
                PositionSide::Long => SignalType::ExitLong,
                PositionSide::Short => SignalType::ExitShort,
            };
            Some(GeneratedSignal {
                symbol: String::new(),
                timestamp,
                signal_type,
                entry_price: symbol_entry_price,
                stop_loss: symbol_entry_price,
                take_profit: symbol_entry_price,
                confidence: analysis.signal_strength,
                signal_strength: analysis.signal_strength,
                metadata: empty_metadata(analysis.signal_strength),
            })
        }
        RecommendedAction::Long => build_directional_signal(analysis, trading, symbol_entry_price, timestamp, config, true),
        RecommendedAction::Short => build_directional_signal(analysis, trading, symbol_entry_price, timestamp, config, false),
    }
}

fn build_directional_signal(
    analysis: &MultiTimeframeAnalysis,
    trading: &TimeframeData,
    entry_price: Price,
    timestamp: crate::time::Timestamp,
    config: &SignalGeneratorConfig,
    is_long: bool,
) -> Option<GeneratedSignal> {
    let envelope = trading.latest_envelope()?;
    let atr_buffer = atr_series(&trading.bars, config.atr_period)
        .last()
        .map(|(_, value)| *value)
        .unwrap_or(Decimal::ZERO);

    let stop_loss = if is_long {
        let support = nearest_zone(&analysis.confluence_zones, ZoneType::Support, entry_price, true);
        let candidate = support.map(|z| z.level - config.stop_buffer_k * atr_buffer);
        match candidate {
            Some(c) => c.max(envelope.lower),
            None => envelope.lower,
        }
    } else {
        let resistance = nearest_zone(&analysis.confluence_zones, ZoneType::Resistance, entry_price, false);
        let candidate = resistance.map(|z| z.level + config.stop_buffer_k * atr_buffer);
        match candidate {
            Some(c) => c.min(envelope.upper),
            None => envelope.upper,
        }
    };

    let stop_is_valid = if is_long { stop_loss < entry_price } else { stop_loss > entry_price };
    if !stop_is_valid {
        return None;
    }
    let per_unit_risk = (entry_price - stop_loss).abs();

    let zone_target = if is_long {
        nearest_zone(&analysis.confluence_zones, ZoneType::Resistance, entry_price, false)
    } else {
        nearest_zone(&analysis.confluence_zones, ZoneType::Support, entry_price, true)
    };

    let take_profit = zone_target
        .map(|z| z.level)
        .filter(|&level| reward(entry_price, stop_loss, level, is_long) >= Decimal::ONE)
        .or_else(|| {
            let fallback = if is_long {
                entry_price + config.reward_multiple * per_unit_risk
            } else {
                entry_price - config.reward_multiple * per_unit_risk
            };
            Some(fallback).filter(|&level| reward(entry_price, stop_loss, level, is_long) >= Decimal::ONE)
        })?;

    let pattern_kinds: Vec<_> = trading
        .patterns
        .iter()
        .filter(|p| p.end_ts == timestamp)
        .map(|p| p.kind)
        .collect();
    let zone_ids: Vec<String> = analysis
        .confluence_zones
        .iter()
        .map(|z| format!("{:?}@{}", z.zone_type, z.level))
        .collect();

    Some(GeneratedSignal {
        symbol: String::new(),
        timestamp,
        signal_type: if is_long { SignalType::Long } else { SignalType::Short },
        entry_price,
        stop_loss,
        take_profit,
        confidence: analysis.signal_strength,
        signal_strength: analysis.signal_strength,
        metadata: SignalMetadata {
            stop: stop_loss,
            target: take_profit,
            confidence: analysis.signal_strength,
            confluence_count: analysis.confluence_zones.len() as u32,
            pattern_kinds,
            zone_ids,
            extras: HashMap::new(),
        },
    })
}

fn reward(entry: Price, stop: Price, target: Price, is_long: bool) -> Decimal {
    let risk = (entry - stop).abs();
    if risk == Decimal::ZERO {
        return Decimal::ZERO;
    }
    let gain = if is_long { target - entry } else { entry - target };
    if gain <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    gain / risk
}

fn nearest_zone(
    zones: &[ConfluenceZone],
    zone_type: ZoneType,
    entry_price: Price,
    below_entry: bool,
) -> Option<&ConfluenceZone> {
    zones
        .iter()
        .filter(|z| z.zone_type == zone_type)
        .filter(|z| if below_entry { z.level < entry_price } else { z.level > entry_price })
        .min_by_key(|z| (z.level - entry_price).abs())
}

fn empty_metadata(confidence: Decimal) -> SignalMetadata {
    SignalMetadata {
        stop: Decimal::ZERO,
        target: Decimal::ZERO,
        confidence,
        confluence_count: 0,
        pattern_kinds: Vec::new(),
        zone_ids: Vec::new(),
        extras: HashMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AlignmentType, Bar, Classification, EnvelopeConfig, HtfPosition, MarketStateConfig, PldotOverlay, RiskLevel,
        TimeframeAlignment, TrendDirection,
    };
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

    fn trading_data() -> TimeframeData {
        let bars: Vec<Bar> = (0..20).map(|i| bar(i, dec!(100) + Decimal::from(i))).collect();
        build_timeframe_data(
            Interval::H1,
            Classification::Trading,
            bars,
            &EnvelopeConfig::default(),
            &MarketStateConfig::default(),
        )
        .unwrap()
    }

    fn analysis_with_action(action: RecommendedAction) -> MultiTimeframeAnalysis {
        MultiTimeframeAnalysis {
            htf_trend: TrendDirection::Up,
            htf_strength: dec!(0.8),
            trading_trend: TrendDirection::Up,
            alignment: TimeframeAlignment {
                alignment_type: AlignmentType::Perfect,
                score: dec!(0.9),
                trade_permitted: true,
            },
            pldot_overlay: PldotOverlay {
                htf_pldot: dec!(100),
                distance_pct: dec!(0),
                position: HtfPosition::AtHtf,
            },
            confluence_zones: Vec::new(),
            pattern_confluence: false,
            signal_strength: dec!(0.8),
            risk_level: RiskLevel::Low,
            recommended_action: action,
        }
    }

    #[test]
    fn wait_emits_nothing() {
        let trading = trading_data();
        let analysis = analysis_with_action(RecommendedAction::Wait);
        assert!(generate_signal(&analysis, &trading, None, &SignalGeneratorConfig::default()).is_none());
    }

    #[test]
    fn long_signal_has_stop_below_entry_and_target_above() {
        let trading = trading_data();
        let analysis = analysis_with_action(RecommendedAction::Long);
        let signal = generate_signal(&analysis, &trading, None, &SignalGeneratorConfig::default()).unwrap();
        assert_eq!(signal.signal_type, SignalType::Long);
        assert!(signal.stop_loss < signal.entry_price);
        assert!(signal.take_profit > signal.entry_price);
    }

    #[test]
    fn reduce_without_held_side_emits_nothing() {
        let trading = trading_data();
        let analysis = analysis_with_action(RecommendedAction::Reduce);
        assert!(generate_signal(&analysis, &trading, None, &SignalGeneratorConfig::default()).is_none());
    }

    #[test]
    fn reduce_with_held_long_emits_exit_long() {
        let trading = trading_data();
        let analysis = analysis_with_action(RecommendedAction::Reduce);
        let signal = generate_signal(&analysis, &trading, Some(PositionSide::Long), &SignalGeneratorConfig::default()).unwrap();
        assert_eq!(signal.signal_type, SignalType::ExitLong);
    }
}
