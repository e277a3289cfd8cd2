//! Market-state classifier (§4.3).

use crate::domain::{Bar, MarketStateConfig, MarketState, PLdotPoint, SlopeTrend, StatePoint, TrendDirection};
use crate::error::IndicatorError;
use crate::money::clamp01;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Position of `close` relative to `pldot.value`: `+1`, `-1`, or `0`.
fn position(close: Decimal, pldot_value: Decimal) -> i8 {
    if close > pldot_value {
        1
    } else if close < pldot_value {
        -1
    } else {
        0
    }
}

fn slope_trend(slope: Decimal, threshold: Decimal) -> SlopeTrend {
    if slope.abs() < threshold {
        SlopeTrend::Horizontal
    } else if slope > Decimal::ZERO {
        SlopeTrend::Rising
    } else {
        SlopeTrend::Falling
    }
}

fn same_sign(a: i8, b: i8) -> bool {
    // Treat 0 as agreeing with whatever it's compared against (§4.3 rule 4).
    a == b || a == 0 || b == 0
}

/// Compute the state series for `(bars, pldot)` aligned by timestamp.
/// `bars` and `pldot` must share the same length and timestamp order —
/// callers pass the trailing `bars` slice matching `pldot`'s window.
pub fn compute_state_series(
    bars: &[Bar],
    pldot: &[PLdotPoint],
    config: &MarketStateConfig,
) -> Result<Vec<StatePoint>, IndicatorError> {
    if bars.len() != pldot.len() {
        return Err(IndicatorError::AlignmentError(format!(
            "bars length {} does not match pldot length {}",
            bars.len(),
            pldot.len()
        )));
    }
    if bars.is_empty() {
        return Ok(Vec::new());
    }

    let mut window: Vec<i8> = Vec::with_capacity(3);
    let mut out = Vec::with_capacity(bars.len());

    let mut prev_state: Option<MarketState> = None;
    let mut prev_direction = TrendDirection::Neutral;
    let mut bars_in_state: u32 = 0;

    for (i, (bar, point)) in bars.iter().zip(pldot.iter()).enumerate() {
        let pos = position(bar.close, point.value);
        window.push(pos);
        if window.len() > 3 {
            window.remove(0);
        }
        let trend = slope_trend(point.slope, config.slope_threshold);

        let (state, direction, reason) = if i == 0 {
            (MarketState::Trend, TrendDirection::Neutral, "Initial state".to_string())
        } else {
            classify(&window, prev_state, prev_direction)
        };

        if Some(state) == prev_state {
            bars_in_state += 1;
        } else {
            bars_in_state = 1;
        }

        let confidence = confidence_score(&window, bars_in_state, state, direction, trend);

        out.push(StatePoint {
            timestamp: point.timestamp,
            state,
            trend_direction: direction,
            bars_in_state,
            previous_state: prev_state,
            pldot_slope_trend: trend,
            confidence,
            reason,
        });

        prev_state = Some(state);
        prev_direction = direction;
    }

    Ok(out)
}

fn classify(
    window: &[i8],
    prev_state: Option<MarketState>,
    prev_direction: TrendDirection,
) -> (MarketState, TrendDirection, String) {
    if window.len() == 3 && window.iter().all(|&p| p == 1) {
        let reason = if prev_state != Some(MarketState::Trend) || prev_direction != TrendDirection::Up {
            "New uptrend"
        } else {
            "Trend continuation"
        };
        return (MarketState::Trend, TrendDirection::Up, reason.to_string());
    }
    if window.len() == 3 && window.iter().all(|&p| p == -1) {
        let reason = if prev_state != Some(MarketState::Trend) || prev_direction != TrendDirection::Down {
            "New downtrend"
        } else {
            "Trend continuation"
        };
        return (MarketState::Trend, TrendDirection::Down, reason.to_string());
    }

    let latest = *window.last().unwrap();
    if prev_state == Some(MarketState::Trend) {
        let opposes = match prev_direction {
            TrendDirection::Up => latest == -1,
            TrendDirection::Down => latest == 1,
            TrendDirection::Neutral => false,
        };
        if opposes {
            return (
                MarketState::CongestionEntrance,
                prev_direction,
                "Trend interrupted".to_string(),
            );
        }
    }

    if window.len() == 3 {
        let alternates = alternating(window);
        if alternates {
            return (
                MarketState::CongestionAction,
                TrendDirection::Neutral,
                "Oscillating around PLdot".to_string(),
            );
        }
    }

    if let Some(prev) = prev_state {
        if prev.is_congestion_family() && window.len() == 3 {
            if window.iter().all(|&p| agrees(p, prev_direction)) {
                return (
                    MarketState::CongestionExit,
                    prev_direction,
                    "Resuming prior trend".to_string(),
                );
            }
            let opposite = prev_direction.opposite();
            if window.iter().all(|&p| agrees(p, opposite)) {
                return (MarketState::Reversal, opposite, "Trend reversed".to_string());
            }
        }
    }

    // No rule matched: hold the previous state/direction (§4.3 is silent on
    // this case; holding avoids spurious churn between the five states).
    (
        prev_state.unwrap_or(MarketState::CongestionAction),
        prev_direction,
        "No state change".to_string(),
    )
}

fn agrees(position: i8, direction: TrendDirection) -> bool {
    match direction {
        TrendDirection::Up => position >= 0,
        TrendDirection::Down => position <= 0,
        TrendDirection::Neutral => true,
    }
}

fn alternating(window: &[i8]) -> bool {
    if window.len() < 3 {
        return false;
    }
    let mut effective = Vec::with_capacity(window.len());
    let mut last_nonzero = window[0];
    effective.push(last_nonzero);
    for &p in &window[1..] {
        let v = if p == 0 { last_nonzero } else { p };
        effective.push(v);
        last_nonzero = v;
    }
    effective[0] != 0
        && effective[1] != 0
        && effective[2] != 0
        && effective[0] != effective[1]
        && effective[1] != effective[2]
}

fn confidence_score(
    window: &[i8],
    bars_in_state: u32,
    state: MarketState,
    direction: TrendDirection,
    slope: SlopeTrend,
) -> Decimal {
    let mut score = dec!(0.5);
    score += (Decimal::from(bars_in_state) * dec!(0.05)).min(dec!(0.3));

    if state == MarketState::Trend {
        let matches = matches!(
            (direction, slope),
            (TrendDirection::Up, SlopeTrend::Rising) | (TrendDirection::Down, SlopeTrend::Falling)
        );
        if matches {
            score += dec!(0.2);
        }
    }

    if state.is_congestion_family() && slope == SlopeTrend::Horizontal {
        score += dec!(0.15);
    }

    if window.len() == 3 {
        let first = window[0];
        if window.iter().all(|&p| p == first) {
            score += dec!(0.1);
        }
    }

    clamp01(score)
}
