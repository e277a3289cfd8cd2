//! TimeframeData — per-(symbol, timeframe) indicator bundle (§3).

use super::bar::Bar;
use super::envelope::EnvelopePoint;
use super::pattern::PatternEvent;
use super::pldot::PLdotPoint;
use super::state::StatePoint;
use crate::time::{Interval, Timestamp};
use serde::{Deserialize, Serialize};

/// Role a timeframe plays within one coordinator invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Higher,
    Trading,
    Lower,
}

/// The fully computed indicator bundle for one symbol on one timeframe.
///
/// `bars`, `pldot`, `envelopes`, and `states` are aligned by timestamp but
/// not necessarily equal length: envelopes and states trail `bars` by their
/// own warm-up requirements (§4.2, §4.3). `patterns` is a finite event
/// sequence, not a per-bar series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeData {
    pub timeframe: Interval,
    pub classification: Classification,
    pub bars: Vec<Bar>,
    pub pldot: Vec<PLdotPoint>,
    pub envelopes: Vec<EnvelopePoint>,
    pub states: Vec<StatePoint>,
    pub patterns: Vec<PatternEvent>,
}

impl TimeframeData {
    pub fn latest_state(&self) -> Option<&StatePoint> {
        self.states.last()
    }

    pub fn latest_pldot(&self) -> Option<&PLdotPoint> {
        self.pldot.last()
    }

    pub fn latest_envelope(&self) -> Option<&EnvelopePoint> {
        self.envelopes.last()
    }

    pub fn latest_bar(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// A view truncated to everything known as of `cutoff` (inclusive).
    /// Series are computed once over the full bar history up front (no
    /// indicator looks ahead, per §4.1's no-look-ahead guarantee), so a
    /// timestamp-ordered truncation is equivalent to recomputing the series
    /// from only the bars up to `cutoff`.
    pub fn as_of(&self, cutoff: Timestamp) -> TimeframeData {
        let bars_len = self.bars.partition_point(|b| b.timestamp <= cutoff);
        TimeframeData {
            timeframe: self.timeframe,
            classification: self.classification,
            bars: self.bars[..bars_len].to_vec(),
            pldot: truncate(&self.pldot, cutoff, |p| p.timestamp),
            envelopes: truncate(&self.envelopes, cutoff, |e| e.timestamp),
            states: truncate(&self.states, cutoff, |s| s.timestamp),
            patterns: self.patterns.iter().filter(|p| p.end_ts <= cutoff).cloned().collect(),
        }
    }
}

fn truncate<T: Clone>(series: &[T], cutoff: Timestamp, ts: impl Fn(&T) -> Timestamp) -> Vec<T> {
    let len = series.partition_point(|item| ts(item) <= cutoff);
    series[..len].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_timeframe_data_has_no_latest() {
        let data = TimeframeData {
            timeframe: Interval::H1,
            classification: Classification::Trading,
            bars: vec![],
            pldot: vec![],
            envelopes: vec![],
            states: vec![],
            patterns: vec![],
        };
        assert!(data.latest_state().is_none());
        assert!(data.latest_pldot().is_none());
        assert!(data.latest_envelope().is_none());
        assert!(data.latest_bar().is_none());
    }

    #[test]
    fn as_of_truncates_all_series_by_timestamp() {
        use crate::indicators::build_timeframe_data;
        use crate::domain::{EnvelopeConfig, MarketStateConfig};
        use chrono::{TimeZone, Utc};
        use rust_decimal::Decimal;
        use rust_decimal_macros::dec;

        let bars: Vec<Bar> = (0..20)
            .map(|i| {
                let c = dec!(100) + Decimal::from(i);
                Bar::new(
                    Utc.timestamp_opt(1_700_000_000 + i * 3_600, 0).unwrap(),
                    c - dec!(0.3),
                    c + dec!(0.5),
                    c - dec!(0.5),
                    c,
                    dec!(1000),
                )
                .unwrap()
            })
            .collect();
        let full = build_timeframe_data(
            Interval::H1,
            Classification::Trading,
            bars.clone(),
            &EnvelopeConfig::default(),
            &MarketStateConfig::default(),
        )
        .unwrap();

        let cutoff = bars[9].timestamp;
        let view = full.as_of(cutoff);
        assert_eq!(view.bars.len(), 10);
        assert!(view.pldot.iter().all(|p| p.timestamp <= cutoff));
        assert!(view.states.iter().all(|s| s.timestamp <= cutoff));
    }
}
