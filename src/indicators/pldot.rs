//! PLdot series computation (§4.1).

use crate::domain::{Bar, PLdotPoint};
use crate::error::IndicatorError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Compute the PLdot series for an ordered bar sequence.
///
/// `value_t = (high_{t-2} + low_{t-2} + high_{t-1} + low_{t-1} + high_t +
/// low_t + 2*close_t) / 8`, stored stamped with `timestamp_t` (§4.1 — the
/// forward projection is exposed via `PLdotPoint::projected_timestamp`, not
/// baked into storage). `slope_t = value_t - value_{t-1}`, `slope_0 = 0`.
///
/// No point in the output depends on any bar beyond its own index `t` —
/// testable property #8 (no look-ahead).
pub fn compute_pldot_series(bars: &[Bar]) -> Result<Vec<PLdotPoint>, IndicatorError> {
    if bars.len() < 3 {
        return Err(IndicatorError::InsufficientHistory {
            required: 3,
            available: bars.len(),
        });
    }

    let mut points = Vec::with_capacity(bars.len() - 2);
    let mut prev_value: Option<Decimal> = None;

    for t in 2..bars.len() {
        let b0 = &bars[t - 2];
        let b1 = &bars[t - 1];
        let b2 = &bars[t];
        let sum = b0.high + b0.low + b1.high + b1.low + b2.high + b2.low + b2.close + b2.close;
        let value = sum / dec!(8);
        let slope = match prev_value {
            Some(prev) => value - prev,
            None => Decimal::ZERO,
        };
        points.push(PLdotPoint {
            timestamp: b2.timestamp,
            value,
            slope,
        });
        prev_value = Some(value);
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

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
    fn too_few_bars_is_insufficient_history() {
        let bars = vec![bar(0, dec!(1), dec!(2), dec!(0), dec!(1))];
        assert_eq!(
            compute_pldot_series(&bars),
            Err(IndicatorError::InsufficientHistory {
                required: 3,
                available: 1
            })
        );
    }

    #[test]
    fn first_point_has_zero_slope() {
        let bars = vec![
            bar(0, dec!(100), dec!(102), dec!(98), dec!(101)),
            bar(1, dec!(101), dec!(103), dec!(99), dec!(102)),
            bar(2, dec!(102), dec!(104), dec!(100), dec!(103)),
        ];
        let points = compute_pldot_series(&bars).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].slope, Decimal::ZERO);
        // (102+98+103+99+104+100+103+103)/8 = 812/8 = 101.5
        assert_eq!(points[0].value, dec!(101.5));
    }

    #[test]
    fn slope_is_difference_of_consecutive_values() {
        let bars = vec![
            bar(0, dec!(100), dec!(102), dec!(98), dec!(101)),
            bar(1, dec!(101), dec!(103), dec!(99), dec!(102)),
            bar(2, dec!(102), dec!(104), dec!(100), dec!(103)),
            bar(3, dec!(103), dec!(106), dec!(101), dec!(105)),
        ];
        let points = compute_pldot_series(&bars).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].slope, points[1].value - points[0].value);
    }

    #[test]
    fn pldot_does_not_look_ahead() {
        let bars = vec![
            bar(0, dec!(100), dec!(102), dec!(98), dec!(101)),
            bar(1, dec!(101), dec!(103), dec!(99), dec!(102)),
            bar(2, dec!(102), dec!(104), dec!(100), dec!(103)),
            bar(3, dec!(103), dec!(106), dec!(101), dec!(105)),
        ];
        let full = compute_pldot_series(&bars).unwrap();
        let truncated = compute_pldot_series(&bars[..3]).unwrap();
        assert_eq!(full[0], truncated[0]);
    }
}
