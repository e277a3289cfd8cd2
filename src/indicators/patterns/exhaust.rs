//! Exhaust detector (§4.4): an envelope extension run that snaps back.

use super::envelope_by_ts;
use crate::domain::{Bar, Direction, EnvelopePoint, PatternEvent, PatternKind};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

const DEFAULT_EXTENSION_THRESHOLD: Decimal = dec!(2.0);
const SNAP_BACK_THRESHOLD: Decimal = dec!(1.0);

/// `extension_t` for a bullish exhaustion is `(close - upper) / width`;
/// bearish is `(lower - close) / width`. Positive means price sits beyond
/// the corresponding band.
fn extension(close: Decimal, point: &EnvelopePoint) -> (Decimal, i8) {
    let bullish = (close - point.upper) / point.width;
    let bearish = (point.lower - close) / point.width;
    if bullish >= bearish {
        (bullish, 1)
    } else {
        (bearish, -1)
    }
}

pub fn detect_exhaust(bars: &[Bar], envelopes: &[EnvelopePoint]) -> Vec<PatternEvent> {
    detect_exhaust_with_threshold(bars, envelopes, DEFAULT_EXTENSION_THRESHOLD)
}

pub fn detect_exhaust_with_threshold(
    bars: &[Bar],
    envelopes: &[EnvelopePoint],
    extension_threshold: Decimal,
) -> Vec<PatternEvent> {
    let index = envelope_by_ts(envelopes);
    let mut events = Vec::new();
    let mut run_start: Option<usize> = None;
    let mut run_side: i8 = 0;
    let mut run_len: u64 = 0;

    for (i, bar) in bars.iter().enumerate() {
        let Some(point) = index.get(&bar.timestamp) else {
            run_start = None;
            run_len = 0;
            continue;
        };
        if point.width == Decimal::ZERO {
            run_start = None;
            run_len = 0;
            continue;
        }
        let (value, side) = extension(bar.close, point);

        if value >= extension_threshold {
            if run_start.is_none() || side != run_side {
                run_start = Some(i);
                run_side = side;
                run_len = 0;
            }
            run_len += 1;
        } else {
            if let Some(start) = run_start {
                if run_len > 0 && value < SNAP_BACK_THRESHOLD {
                    events.push(PatternEvent {
                        kind: PatternKind::Exhaust,
                        direction: Direction::from_sign(Decimal::from(-run_side)),
                        start_ts: bars[start].timestamp,
                        end_ts: bar.timestamp,
                        strength: Decimal::from(run_len),
                        metadata: HashMap::new(),
                    });
                }
            }
            run_start = None;
            run_len = 0;
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn bar(i: i64, c: Decimal) -> Bar {
        Bar::new(
            Utc.timestamp_opt(1_700_000_000 + i * 60, 0).unwrap(),
            c,
            c + dec!(0.1),
            c - dec!(0.1),
            c,
            dec!(1000),
        )
        .unwrap()
    }

    fn env(i: i64, middle: Decimal, upper: Decimal, lower: Decimal) -> EnvelopePoint {
        EnvelopePoint {
            timestamp: Utc.timestamp_opt(1_700_000_000 + i * 60, 0).unwrap(),
            upper,
            middle,
            lower,
            width: upper - lower,
        }
    }

    #[test]
    fn extension_then_snapback_emits_bearish_direction() {
        let bars = vec![
            bar(0, dec!(100)),
            bar(1, dec!(103)), // extension = (103-101)/2 = 1.0, below threshold
            bar(2, dec!(105)), // extension = (105-101)/2 = 2.0, at threshold
            bar(3, dec!(100.5)), // snaps back: extension = (100.5-101)/2 = -0.25 < 1.0
        ];
        let envelopes = vec![
            env(0, dec!(100), dec!(101), dec!(99)),
            env(1, dec!(100), dec!(101), dec!(99)),
            env(2, dec!(100), dec!(101), dec!(99)),
            env(3, dec!(100), dec!(101), dec!(99)),
        ];
        let events = detect_exhaust(&bars, &envelopes);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].direction, Direction::DOWN);
    }

    #[test]
    fn no_extension_emits_nothing() {
        let bars = vec![bar(0, dec!(100)), bar(1, dec!(100.2))];
        let envelopes = vec![
            env(0, dec!(100), dec!(101), dec!(99)),
            env(1, dec!(100), dec!(101), dec!(99)),
        ];
        assert!(detect_exhaust(&bars, &envelopes).is_empty());
    }
}
