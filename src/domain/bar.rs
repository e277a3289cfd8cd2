//! Bar — the fundamental OHLCV market data unit (§3).

use crate::error::ConfigError;
use crate::money::Price;
use crate::time::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single symbol on a single timeframe.
///
/// Invariant (testable property #1): `low <= min(open, close) <= max(open,
/// close) <= high` and `volume >= 0`. Bars are immutable once constructed —
/// `Bar::new` is the only way to build one and it enforces the invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: Timestamp,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: Decimal,
}

impl Bar {
    /// Construct a bar, validating the OHLC/volume invariant.
    ///
    /// A synthesized bar that violates the invariant is a fatal configuration
    /// error (§8 property #1), not a recoverable one — the caller is feeding
    /// corrupt data and the run should not proceed on it.
    pub fn new(
        timestamp: Timestamp,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Decimal,
    ) -> Result<Self, ConfigError> {
        let bar = Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        };
        bar.validate()?;
        Ok(bar)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let body_low = self.open.min(self.close);
        let body_high = self.open.max(self.close);
        if !(self.low <= body_low && body_low <= body_high && body_high <= self.high) {
            return Err(ConfigError::InvalidConfiguration(format!(
                "bar at {} violates OHLC ordering: low={} open={} close={} high={}",
                self.timestamp, self.low, self.open, self.close, self.high
            )));
        }
        if self.volume < Decimal::ZERO {
            return Err(ConfigError::InvalidConfiguration(format!(
                "bar at {} has negative volume: {}",
                self.timestamp, self.volume
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn ts(i: i64) -> Timestamp {
        Utc.timestamp_opt(1_700_000_000 + i * 60, 0).unwrap()
    }

    #[test]
    fn valid_bar_constructs() {
        let bar = Bar::new(ts(0), dec!(100), dec!(105), dec!(98), dec!(103), dec!(1000));
        assert!(bar.is_ok());
    }

    #[test]
    fn high_below_close_is_rejected() {
        let bar = Bar::new(ts(0), dec!(100), dec!(101), dec!(98), dec!(103), dec!(1000));
        assert!(bar.is_err());
    }

    #[test]
    fn low_above_open_is_rejected() {
        let bar = Bar::new(ts(0), dec!(100), dec!(105), dec!(101), dec!(103), dec!(1000));
        assert!(bar.is_err());
    }

    #[test]
    fn negative_volume_is_rejected() {
        let bar = Bar::new(ts(0), dec!(100), dec!(105), dec!(98), dec!(103), dec!(-1));
        assert!(bar.is_err());
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = Bar::new(ts(0), dec!(100), dec!(105), dec!(98), dec!(103), dec!(1000)).unwrap();
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
