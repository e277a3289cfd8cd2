//! Pattern detectors (§4.4).
//!
//! Each detector takes its own pass over `(bars, pldot, envelopes)` and does
//! not depend on any other detector's output (§9 "pattern detectors
//! independence").

pub mod congestion_oscillation;
pub mod cwave;
pub mod exhaust;
pub mod pldot_push;
pub mod pldot_refresh;

pub use congestion_oscillation::detect_congestion_oscillation;
pub use cwave::detect_cwave;
pub use exhaust::detect_exhaust;
pub use pldot_push::detect_pldot_push;
pub use pldot_refresh::detect_pldot_refresh;

use crate::domain::{Bar, EnvelopePoint, PLdotPoint, PatternEvent};
use crate::time::Timestamp;
use std::collections::HashMap;

/// Index a PLdot series by timestamp for random access from a bar-indexed loop.
pub(crate) fn pldot_by_ts(pldot: &[PLdotPoint]) -> HashMap<Timestamp, &PLdotPoint> {
    pldot.iter().map(|p| (p.timestamp, p)).collect()
}

/// Index an envelope series by timestamp for random access from a bar-indexed loop.
pub(crate) fn envelope_by_ts(envelopes: &[EnvelopePoint]) -> HashMap<Timestamp, &EnvelopePoint> {
    envelopes.iter().map(|e| (e.timestamp, e)).collect()
}

/// Run all five detectors over one timeframe's aligned series and return
/// every emitted event, in detector-declaration order.
pub fn detect_all(bars: &[Bar], pldot: &[PLdotPoint], envelopes: &[EnvelopePoint]) -> Vec<PatternEvent> {
    let mut events = Vec::new();
    events.extend(detect_pldot_push(bars, pldot));
    events.extend(detect_pldot_refresh(bars, pldot, envelopes));
    events.extend(detect_exhaust(bars, envelopes));
    events.extend(detect_cwave(bars));
    events.extend(detect_congestion_oscillation(bars, pldot, envelopes));
    events
}
