//! CongestionOscillation detector (§4.4): a run of bars whose closes stay
//! inside the envelope band while the PLdot slope is horizontal.

use super::{envelope_by_ts, pldot_by_ts};
use crate::domain::{Bar, Direction, EnvelopePoint, PLdotPoint, PatternEvent, PatternKind, SlopeTrend};
use crate::domain::MarketStateConfig;
use rust_decimal::Decimal;
use std::collections::HashMap;

const MIN_RUN_LENGTH: usize = 4;

pub fn detect_congestion_oscillation(
    bars: &[Bar],
    pldot: &[PLdotPoint],
    envelopes: &[EnvelopePoint],
) -> Vec<PatternEvent> {
    detect_with_slope_threshold(bars, pldot, envelopes, MarketStateConfig::default().slope_threshold)
}

pub fn detect_with_slope_threshold(
    bars: &[Bar],
    pldot: &[PLdotPoint],
    envelopes: &[EnvelopePoint],
    slope_threshold: Decimal,
) -> Vec<PatternEvent> {
    let pldot_index = pldot_by_ts(pldot);
    let envelope_index = envelope_by_ts(envelopes);
    let mut events = Vec::new();
    let mut run_start: Option<usize> = None;

    let mut flush = |run_start: &mut Option<usize>, end_idx: usize, events: &mut Vec<PatternEvent>| {
        if let Some(start) = *run_start {
            let len = end_idx - start;
            if len >= MIN_RUN_LENGTH {
                events.push(PatternEvent {
                    kind: PatternKind::CongestionOscillation,
                    direction: Direction::NEUTRAL,
                    start_ts: bars[start].timestamp,
                    end_ts: bars[end_idx - 1].timestamp,
                    strength: Decimal::from(len as u64),
                    metadata: HashMap::new(),
                });
            }
        }
        *run_start = None;
    };

    for (i, bar) in bars.iter().enumerate() {
        let in_band = pldot_index
            .get(&bar.timestamp)
            .zip(envelope_index.get(&bar.timestamp))
            .is_some_and(|(point, envelope)| {
                let horizontal = point.slope.abs() < slope_threshold;
                let inside = bar.close >= envelope.lower && bar.close <= envelope.upper;
                horizontal && inside
            });

        if in_band {
            if run_start.is_none() {
                run_start = Some(i);
            }
        } else {
            flush(&mut run_start, i, &mut events);
        }
    }
    flush(&mut run_start, bars.len(), &mut events);

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EnvelopeConfig, EnvelopeMethod};
    use crate::indicators::envelope::compute_envelope_series;
    use crate::indicators::pldot::compute_pldot_series;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn bar(i: i64, c: Decimal) -> Bar {
        Bar::new(
            Utc.timestamp_opt(1_700_000_000 + i * 60, 0).unwrap(),
            c,
            c + dec!(0.3),
            c - dec!(0.3),
            c,
            dec!(1000),
        )
        .unwrap()
    }

    #[test]
    fn flat_series_is_one_long_oscillation() {
        let bars: Vec<Bar> = (0..12).map(|i| bar(i, dec!(100))).collect();
        let pldot = compute_pldot_series(&bars).unwrap();
        let trailing = &bars[2..];
        let config = EnvelopeConfig {
            method: EnvelopeMethod::PldotRange,
            period: 3,
            multiplier: dec!(1.5),
        };
        let envelopes = compute_envelope_series(trailing, &pldot, &config).unwrap();
        let events = detect_congestion_oscillation(trailing, &pldot, &envelopes);
        assert!(events.iter().any(|e| e.kind == PatternKind::CongestionOscillation));
        for event in &events {
            assert_eq!(event.direction, Direction::NEUTRAL);
            assert!(event.strength >= Decimal::from(MIN_RUN_LENGTH as u64));
        }
    }

    #[test]
    fn strong_trend_does_not_oscillate() {
        let bars: Vec<Bar> = (0..12)
            .map(|i| bar(i, dec!(100) + Decimal::from(i) * dec!(5)))
            .collect();
        let pldot = compute_pldot_series(&bars).unwrap();
        let trailing = &bars[2..];
        let config = EnvelopeConfig::default();
        let envelopes = compute_envelope_series(trailing, &pldot, &config).unwrap();
        let events = detect_congestion_oscillation(trailing, &pldot, &envelopes);
        assert!(events.is_empty());
    }
}
