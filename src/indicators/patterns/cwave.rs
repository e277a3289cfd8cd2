//! CWave detector (§4.4): a three-swing structure where swing 2 retraces
//! into but not through swing 1, and swing 3 exceeds swing 1.

use crate::domain::{Bar, Direction, PatternEvent, PatternKind};
use rust_decimal::Decimal;
use std::collections::HashMap;

const DEFAULT_LOOKBACK: usize = 2;

struct Swing {
    index: usize,
    value: Decimal,
}

fn find_swings(bars: &[Bar], lookback: usize) -> Vec<Swing> {
    let n = bars.len();
    let mut swings = Vec::new();
    if n < 2 * lookback + 1 {
        return swings;
    }
    for i in lookback..(n - lookback) {
        let window = &bars[i - lookback..=i + lookback];
        let close = bars[i].close;
        let is_max = window.iter().all(|b| b.close <= close);
        let is_min = window.iter().all(|b| b.close >= close);
        if is_max || is_min {
            swings.push(Swing { index: i, value: close });
        }
    }
    swings
}

pub fn detect_cwave(bars: &[Bar]) -> Vec<PatternEvent> {
    detect_cwave_with_lookback(bars, DEFAULT_LOOKBACK)
}

pub fn detect_cwave_with_lookback(bars: &[Bar], lookback: usize) -> Vec<PatternEvent> {
    let swings = find_swings(bars, lookback);
    let mut events = Vec::new();

    for window in swings.windows(4) {
        let [s0, s1, s2, s3] = window else { continue };
        let swing1 = s1.value - s0.value;
        let swing2 = s2.value - s1.value;
        let swing3 = s3.value - s2.value;

        if swing1 == Decimal::ZERO || swing3 == Decimal::ZERO {
            continue;
        }
        let retraces_without_passing_through = swing2.signum() != swing1.signum() && swing2.abs() < swing1.abs();
        let continuation_exceeds_swing1 = swing3.signum() == swing1.signum() && swing3.abs() > swing1.abs();

        if retraces_without_passing_through && continuation_exceeds_swing1 {
            events.push(PatternEvent {
                kind: PatternKind::CWave,
                direction: Direction::from_sign(swing3),
                start_ts: bars[s0.index].timestamp,
                end_ts: bars[s3.index].timestamp,
                strength: swing3.abs(),
                metadata: HashMap::new(),
            });
        }
    }

    events
}
