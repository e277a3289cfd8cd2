//! Pending-order queue (§4.7.2 step 1 / step 8).
//!
//! Entry signals accepted during a timestep are queued here and executed at
//! the *next* timestep's open, never the same bar they were generated on.

use crate::domain::{PositionSide, Symbol};
use crate::money::{Price, Ratio};
use crate::time::Timestamp;

/// A queued entry, waiting for next-step open execution.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEntry {
    pub symbol: Symbol,
    pub side: PositionSide,
    pub stop_loss: Price,
    pub take_profit: Price,
    pub confidence: Ratio,
    pub queued_at: Timestamp,
}

/// FIFO-per-symbol queue of pending entries. At most one pending entry per
/// symbol is kept; a newer signal for a symbol already queued replaces the
/// older one rather than stacking (queueing two same-symbol entries in one
/// step would otherwise double a position the next bar).
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    pending: Vec<PendingEntry>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self { pending: Vec::new() }
    }

    pub fn enqueue(&mut self, entry: PendingEntry) {
        if let Some(existing) = self.pending.iter_mut().find(|e| e.symbol == entry.symbol) {
            *existing = entry;
        } else {
            self.pending.push(entry);
        }
    }

    /// Remove and return every pending entry, in FIFO order, for execution
    /// at the start of the next timestep.
    pub fn drain(&mut self) -> Vec<PendingEntry> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn cancel(&mut self, symbol: &str) {
        self.pending.retain(|e| e.symbol != symbol);
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.pending.iter().any(|e| e.symbol == symbol)
    }
}
