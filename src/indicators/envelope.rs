//! Envelope series computation (§4.2).

use super::atr::atr_series;
use crate::domain::{Bar, EnvelopeConfig, EnvelopeMethod, EnvelopePoint, PLdotPoint};
use crate::error::IndicatorError;
use crate::money::stddev;
use std::collections::HashMap;

/// Compute the envelope series for `(bars, pldot)` aligned by timestamp.
///
/// Both methods omit points before enough history accumulates, so the
/// output is shorter than `pldot` by `config.period - 1` points (§4.2);
/// timestamp alignment with `pldot` is preserved for every emitted point.
pub fn compute_envelope_series(
    bars: &[Bar],
    pldot: &[PLdotPoint],
    config: &EnvelopeConfig,
) -> Result<Vec<EnvelopePoint>, IndicatorError> {
    if config.period == 0 {
        return Err(IndicatorError::AlignmentError(
            "envelope period must be >= 1".to_string(),
        ));
    }

    match config.method {
        EnvelopeMethod::PldotRange => Ok(pldot_range_envelope(pldot, config)),
        EnvelopeMethod::Atr => atr_envelope(bars, pldot, config),
    }
}

fn pldot_range_envelope(pldot: &[PLdotPoint], config: &EnvelopeConfig) -> Vec<EnvelopePoint> {
    if pldot.len() < config.period {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(pldot.len() - config.period + 1);
    for t in (config.period - 1)..pldot.len() {
        let window: Vec<_> = pldot[t + 1 - config.period..=t].iter().map(|p| p.value).collect();
        let offset = stddev(&window) * config.multiplier;
        out.push(EnvelopePoint::new(pldot[t].timestamp, pldot[t].value, offset));
    }
    out
}

fn atr_envelope(
    bars: &[Bar],
    pldot: &[PLdotPoint],
    config: &EnvelopeConfig,
) -> Result<Vec<EnvelopePoint>, IndicatorError> {
    let atr = atr_series(bars, config.period);
    if atr.is_empty() {
        return Ok(Vec::new());
    }
    let atr_by_ts: HashMap<_, _> = atr.into_iter().collect();

    let mut out = Vec::new();
    for point in pldot {
        if let Some(atr_value) = atr_by_ts.get(&point.timestamp) {
            let offset = *atr_value * config.multiplier;
            out.push(EnvelopePoint::new(point.timestamp, point.value, offset));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::pldot::compute_pldot_series;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
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

    fn rising_bars(n: i64) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let close = dec!(100) + Decimal::from(i);
                bar(i, close - dec!(1), close + dec!(0.5), close - dec!(0.5), close)
            })
            .collect()
    }

    #[test]
    fn pldot_range_bounds_respect_middle() {
        let bars = rising_bars(10);
        let pldot = compute_pldot_series(&bars).unwrap();
        let config = EnvelopeConfig::default();
        let envelope = compute_envelope_series(&bars, &pldot, &config).unwrap();
        assert!(!envelope.is_empty());
        for point in &envelope {
            assert!(point.lower <= point.middle);
            assert!(point.middle <= point.upper);
        }
    }

    #[test]
    fn envelope_shorter_than_pldot_by_warmup() {
        let bars = rising_bars(10);
        let pldot = compute_pldot_series(&bars).unwrap();
        let config = EnvelopeConfig::default();
        let envelope = compute_envelope_series(&bars, &pldot, &config).unwrap();
        assert_eq!(envelope.len(), pldot.len() - (config.period - 1));
    }

    #[test]
    fn atr_method_aligns_timestamps() {
        let bars = rising_bars(10);
        let pldot = compute_pldot_series(&bars).unwrap();
        let config = EnvelopeConfig {
            method: EnvelopeMethod::Atr,
            period: 3,
            multiplier: dec!(1.5),
        };
        let envelope = compute_envelope_series(&bars, &pldot, &config).unwrap();
        for point in &envelope {
            assert!(pldot.iter().any(|p| p.timestamp == point.timestamp));
        }
    }

    #[test]
    fn zero_period_is_alignment_error() {
        let bars = rising_bars(5);
        let pldot = compute_pldot_series(&bars).unwrap();
        let config = EnvelopeConfig {
            method: EnvelopeMethod::PldotRange,
            period: 0,
            multiplier: dec!(1.5),
        };
        assert!(compute_envelope_series(&bars, &pldot, &config).is_err());
    }
}
