//! Indicator engine: PLdot, envelope bands, market-state classifier, and
//! pattern detectors (§4.1-§4.4). Indicators are pure functions over bar
//! history; nothing here mutates shared state, so results may be computed
//! for different symbols in parallel (§5).

pub mod atr;
pub mod envelope;
pub mod patterns;
pub mod pldot;
pub mod state_classifier;

pub use atr::atr_series;
pub use envelope::compute_envelope_series;
pub use patterns::detect_all;
pub use pldot::compute_pldot_series;
pub use state_classifier::compute_state_series;

use crate::domain::{Bar, Classification, EnvelopeConfig, MarketStateConfig, TimeframeData};
use crate::error::IndicatorError;
use crate::time::Interval;

/// Build a complete `TimeframeData` bundle from raw bars: PLdot, envelope,
/// state, and pattern series, in that dependency order (§2 pipeline).
pub fn build_timeframe_data(
    timeframe: Interval,
    classification: Classification,
    bars: Vec<Bar>,
    envelope_config: &EnvelopeConfig,
    state_config: &MarketStateConfig,
) -> Result<TimeframeData, IndicatorError> {
    let pldot = compute_pldot_series(&bars)?;
    let trailing_bars = &bars[2..];
    let envelopes = compute_envelope_series(trailing_bars, &pldot, envelope_config)?;
    let states = compute_state_series(trailing_bars, &pldot, state_config)?;
    let patterns = detect_all(trailing_bars, &pldot, &envelopes);

    Ok(TimeframeData {
        timeframe,
        classification,
        bars,
        pldot,
        envelopes,
        states,
        patterns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn bar(i: i64, c: Decimal) -> Bar {
        Bar::new(
            Utc.timestamp_opt(1_700_000_000 + i * 60, 0).unwrap(),
            c - dec!(0.3),
            c + dec!(0.5),
            c - dec!(0.5),
            c,
            dec!(1000),
        )
        .unwrap()
    }

    #[test]
    fn build_timeframe_data_produces_aligned_series() {
        let bars: Vec<Bar> = (0..20).map(|i| bar(i, dec!(100) + Decimal::from(i))).collect();
        let data = build_timeframe_data(
            Interval::H1,
            Classification::Trading,
            bars,
            &EnvelopeConfig::default(),
            &MarketStateConfig::default(),
        )
        .unwrap();
        assert_eq!(data.pldot.len(), data.bars.len() - 2);
        assert_eq!(data.states.len(), data.pldot.len());
        assert!(data.envelopes.len() <= data.pldot.len());
    }

    #[test]
    fn insufficient_bars_propagates_error() {
        let bars: Vec<Bar> = (0..2).map(|i| bar(i, dec!(100))).collect();
        let result = build_timeframe_data(
            Interval::H1,
            Classification::Trading,
            bars,
            &EnvelopeConfig::default(),
            &MarketStateConfig::default(),
        );
        assert!(result.is_err());
    }
}
