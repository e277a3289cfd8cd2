//! PLdotPoint — the projected three-bar composite value (§3, §4.1).

use crate::money::Price;
use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

/// One point of the PLdot series.
///
/// `value` is stored stamped with the timestamp of the bar whose window
/// produced it (`timestamp_t`), not the forward-projected timestamp — see
/// `project_forward` and §4.1's "internally store with `timestamp_t`" note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PLdotPoint {
    pub timestamp: Timestamp,
    pub value: Price,
    pub slope: Price,
}

impl PLdotPoint {
    /// The level this point projects onto the *next* bar. Per §4.1, a PLdot
    /// value computed from bars `t-2..t` is the projected level for `t+1`.
    pub fn projected_timestamp(&self, next_bar_timestamp: Timestamp) -> Timestamp {
        next_bar_timestamp
    }
}
