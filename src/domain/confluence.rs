//! ConfluenceZone — a price band confirmed by more than one timeframe (§3, §4.5 step 4).

use crate::money::Price;
use crate::time::{Interval, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneType {
    Support,
    Resistance,
    Pivot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfluenceZone {
    pub level: Price,
    pub lower: Price,
    pub upper: Price,
    pub strength: u32,
    pub confirming_timeframes: Vec<Interval>,
    pub zone_type: ZoneType,
    pub first_touch_ts: Timestamp,
    pub last_touch_ts: Timestamp,
}

impl ConfluenceZone {
    /// Classify the zone relative to the current price (§4.5 step 4):
    /// `Support` if price is above the zone, `Resistance` if below, else `Pivot`.
    pub fn classify(current_price: Price, lower: Price, upper: Price) -> ZoneType {
        if current_price > upper {
            ZoneType::Support
        } else if current_price < lower {
            ZoneType::Resistance
        } else {
            ZoneType::Pivot
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn price_above_zone_is_support() {
        assert_eq!(
            ConfluenceZone::classify(dec!(110), dec!(95), dec!(100)),
            ZoneType::Support
        );
    }

    #[test]
    fn price_below_zone_is_resistance() {
        assert_eq!(
            ConfluenceZone::classify(dec!(90), dec!(95), dec!(100)),
            ZoneType::Resistance
        );
    }

    #[test]
    fn price_inside_zone_is_pivot() {
        assert_eq!(
            ConfluenceZone::classify(dec!(97), dec!(95), dec!(100)),
            ZoneType::Pivot
        );
    }
}
