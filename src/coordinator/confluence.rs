//! Confluence-zone clustering (§4.5 step 4, §9 "Confluence clustering").
//!
//! Candidates are sorted then swept once, which is exact under the
//! tolerance-percent definition for the `W <= 50` window the spec bounds —
//! an O(n^2) all-pairs pass is unnecessary at this scale.

use crate::domain::{ConfluenceZone, ZoneType};
use crate::money::Price;
use crate::time::{Interval, Timestamp};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub timeframe: Interval,
    pub timestamp: Timestamp,
    pub level: Price,
}

/// Cluster candidate levels into confluence zones. Two candidates merge
/// into the same zone if their level is within `tolerance_pct` of the
/// zone's running mean. A zone survives only if confirmed by `strength >= 2`
/// distinct timeframes.
pub fn cluster_confluence_zones(
    mut candidates: Vec<Candidate>,
    tolerance_pct: Decimal,
    current_price: Price,
) -> Vec<ConfluenceZone> {
    candidates.sort_by(|a, b| a.level.cmp(&b.level));

    let mut zones: Vec<Vec<Candidate>> = Vec::new();
    for candidate in candidates {
        let mut placed = false;
        if let Some(last_zone) = zones.last_mut() {
            let mean = zone_mean(last_zone);
            if mean != Decimal::ZERO && (candidate.level - mean).abs() / mean.abs() <= tolerance_pct {
                last_zone.push(candidate);
                placed = true;
            }
        }
        if !placed {
            zones.push(vec![candidate]);
        }
    }

    zones
        .into_iter()
        .filter_map(|group| {
            let mut timeframes: Vec<Interval> = group.iter().map(|c| c.timeframe).collect();
            timeframes.sort_by_key(interval_rank);
            timeframes.dedup();
            if timeframes.len() < 2 {
                return None;
            }
            let level = zone_mean(&group);
            let lower = group.iter().map(|c| c.level).min()?;
            let upper = group.iter().map(|c| c.level).max()?;
            let first_touch_ts = group.iter().map(|c| c.timestamp).min()?;
            let last_touch_ts = group.iter().map(|c| c.timestamp).max()?;
            Some(ConfluenceZone {
                level,
                lower,
                upper,
                strength: timeframes.len() as u32,
                confirming_timeframes: timeframes,
                zone_type: ConfluenceZone::classify(current_price, lower, upper),
                first_touch_ts,
                last_touch_ts,
            })
        })
        .collect()
}

fn zone_mean(group: &[Candidate]) -> Decimal {
    let sum: Decimal = group.iter().map(|c| c.level).sum();
    sum / Decimal::from(group.len() as u64)
}

fn interval_rank(interval: &Interval) -> i64 {
    interval.seconds()
}
