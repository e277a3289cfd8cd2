//! EnvelopePoint and envelope configuration (§3, §4.2).

use crate::money::Price;
use crate::time::Timestamp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Envelope band computation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvelopeMethod {
    /// Standard deviation of recent PLdot values, scaled by `multiplier`.
    /// The canonical Drummond envelope (§4.2 design rationale).
    PldotRange,
    /// Wilder's ATR, scaled by `multiplier`.
    Atr,
}

/// Configuration for envelope band computation.
///
/// `Default` produces the canonical 3-period `PldotRange` envelope, not a
/// 14-period ATR — the 3/1.5 `PldotRange` default is the one §4.2
/// explicitly calls out as correct; a 14-period ATR is "a foreign
/// convention" per the design rationale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeConfig {
    pub method: EnvelopeMethod,
    pub period: usize,
    pub multiplier: Decimal,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            method: EnvelopeMethod::PldotRange,
            period: 3,
            multiplier: dec!(1.5),
        }
    }
}

/// One point of the envelope series.
///
/// Invariant (§8 property #7): `lower <= middle <= upper` for every point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopePoint {
    pub timestamp: Timestamp,
    pub upper: Price,
    pub middle: Price,
    pub lower: Price,
    pub width: Price,
}

impl EnvelopePoint {
    pub fn new(timestamp: Timestamp, middle: Price, offset: Price) -> Self {
        let offset = offset.abs();
        let upper = middle + offset;
        let lower = middle - offset;
        Self {
            timestamp,
            upper,
            middle,
            lower,
            width: upper - lower,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn default_is_canonical_pldot_range() {
        let config = EnvelopeConfig::default();
        assert_eq!(config.method, EnvelopeMethod::PldotRange);
        assert_eq!(config.period, 3);
        assert_eq!(config.multiplier, dec!(1.5));
    }

    #[test]
    fn bounds_respect_middle() {
        let point = EnvelopePoint::new(Utc.timestamp_opt(0, 0).unwrap(), dec!(100), dec!(5));
        assert!(point.lower <= point.middle);
        assert!(point.middle <= point.upper);
        assert_eq!(point.width, dec!(10));
    }

    #[test]
    fn negative_offset_is_normalized() {
        let point = EnvelopePoint::new(Utc.timestamp_opt(0, 0).unwrap(), dec!(100), dec!(-5));
        assert_eq!(point.upper, dec!(105));
        assert_eq!(point.lower, dec!(95));
    }
}
