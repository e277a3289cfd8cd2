//! PLdotPush detector (§4.4): three or more consecutive closes on the same
//! side of `pldot.value` with monotonically growing distance.

use super::pldot_by_ts;
use crate::domain::{Bar, Direction, PLdotPoint, PatternEvent, PatternKind};
use rust_decimal::Decimal;
use std::collections::HashMap;

pub fn detect_pldot_push(bars: &[Bar], pldot: &[PLdotPoint]) -> Vec<PatternEvent> {
    let index = pldot_by_ts(pldot);
    let mut events = Vec::new();
    let mut run: Vec<(usize, Decimal, Decimal)> = Vec::new();

    for (i, bar) in bars.iter().enumerate() {
        let Some(point) = index.get(&bar.timestamp) else {
            flush_run(&run, bars, &mut events);
            run.clear();
            continue;
        };
        let distance = bar.close - point.value;
        let side = Decimal::from(if distance > Decimal::ZERO { 1 } else if distance < Decimal::ZERO { -1 } else { 0 });

        let extends = match run.last() {
            Some(&(_, prev_side, prev_abs_distance)) => {
                side != Decimal::ZERO && side == prev_side && distance.abs() > prev_abs_distance
            }
            None => side != Decimal::ZERO,
        };

        if extends {
            run.push((i, side, distance.abs()));
        } else {
            flush_run(&run, bars, &mut events);
            run.clear();
            if side != Decimal::ZERO {
                run.push((i, side, distance.abs()));
            }
        }
    }
    flush_run(&run, bars, &mut events);
    events
}

fn flush_run(run: &[(usize, Decimal, Decimal)], bars: &[Bar], events: &mut Vec<PatternEvent>) {
    if run.len() < 3 {
        return;
    }
    let (start_idx, side, _) = run[0];
    let (end_idx, _, _) = *run.last().unwrap();
    events.push(PatternEvent {
        kind: PatternKind::PLdotPush,
        direction: Direction::from_sign(side),
        start_ts: bars[start_idx].timestamp,
        end_ts: bars[end_idx].timestamp,
        strength: Decimal::from(run.len() as u64),
        metadata: HashMap::new(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn growing_push_above_pldot_is_detected() {
        let bars: Vec<Bar> = (0..8)
            .map(|i| {
                let close = dec!(100) + Decimal::from(i) * dec!(2);
                bar(i, close - dec!(1), close + dec!(1), close - dec!(1.5), close)
            })
            .collect();
        let pldot = compute_pldot_series(&bars).unwrap();
        let trailing = &bars[2..];
        let events = detect_pldot_push(trailing, &pldot);
        assert!(events.iter().any(|e| e.kind == PatternKind::PLdotPush && e.direction == Direction::UP));
    }

    #[test]
    fn flat_series_detects_nothing() {
        let bars: Vec<Bar> = (0..8).map(|i| bar(i, dec!(100), dec!(100.5), dec!(99.5), dec!(100))).collect();
        let pldot = compute_pldot_series(&bars).unwrap();
        let trailing = &bars[2..];
        let events = detect_pldot_push(trailing, &pldot);
        assert!(events.is_empty());
    }
}
