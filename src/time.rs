//! Time utilities: UTC instants with millisecond precision and bar-interval
//! labels (§3).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC instant truncated to millisecond precision.
pub type Timestamp = DateTime<Utc>;

/// Bar-interval label, e.g. "30m", "1h", "4h", "1d".
///
/// Modeled as an enum rather than a bare string (§E of SPEC_FULL.md) so the
/// coordinator can compare timeframes structurally instead of parsing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    M1,
    M5,
    M15,
    M30,
    H1,
    H4,
    D1,
    W1,
}

impl Interval {
    /// Nominal duration of one bar, in seconds. Used for annualization
    /// (§4.7.5) and window-based lookbacks.
    pub fn seconds(self) -> i64 {
        match self {
            Interval::M1 => 60,
            Interval::M5 => 5 * 60,
            Interval::M15 => 15 * 60,
            Interval::M30 => 30 * 60,
            Interval::H1 => 3_600,
            Interval::H4 => 4 * 3_600,
            Interval::D1 => 24 * 3_600,
            Interval::W1 => 7 * 24 * 3_600,
        }
    }

    /// Number of bars of this interval in a 365-day year, for annualization.
    pub fn periods_per_year(self) -> f64 {
        let seconds_per_year = 365.0 * 24.0 * 3_600.0;
        seconds_per_year / self.seconds() as f64
    }

    /// Same ratio as [`Self::periods_per_year`], computed directly from
    /// integer seconds rather than round-tripping through `f64`, for use in
    /// `Decimal`-typed annualization math.
    pub fn periods_per_year_decimal(self) -> crate::money::Ratio {
        use rust_decimal::Decimal;
        const SECONDS_PER_YEAR: i64 = 365 * 24 * 3_600;
        Decimal::from(SECONDS_PER_YEAR) / Decimal::from(self.seconds())
    }

    pub fn label(self) -> &'static str {
        match self {
            Interval::M1 => "1m",
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::M30 => "30m",
            Interval::H1 => "1h",
            Interval::H4 => "4h",
            Interval::D1 => "1d",
            Interval::W1 => "1w",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_are_ordered() {
        assert!(Interval::M30.seconds() < Interval::H1.seconds());
        assert!(Interval::H1.seconds() < Interval::H4.seconds());
        assert!(Interval::H4.seconds() < Interval::D1.seconds());
    }

    #[test]
    fn periods_per_year_daily_is_about_365() {
        let ppy = Interval::D1.periods_per_year();
        assert!((ppy - 365.0).abs() < 1e-9);
    }

    #[test]
    fn label_roundtrips_display() {
        assert_eq!(Interval::H4.to_string(), "4h");
    }
}
