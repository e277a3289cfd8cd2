//! Timestep — one synchronized slice of the multi-symbol bar stream (§4.7.2).

use crate::domain::{Bar, Symbol};
use crate::time::Timestamp;
use std::collections::BTreeMap;

/// All symbols sharing a single timestamp. `BTreeMap` gives lexicographic
/// symbol ordering for free, matching the deterministic collection order
/// required by §5.
#[derive(Debug, Clone, PartialEq)]
pub struct Timestep {
    pub timestamp: Timestamp,
    pub bars: BTreeMap<Symbol, Bar>,
}

impl Timestep {
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            bars: BTreeMap::new(),
        }
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.bars.keys()
    }
}
