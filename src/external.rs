//! External interface contracts (§6). Wire formats and CLI framing are out
//! of scope for this crate; these traits fix the boundary shapes that a
//! data pipeline, a persistence layer, and a live-signal consumer implement.

use crate::domain::{GeneratedSignal, MultiTimeframeAnalysis, Symbol};
use crate::engine::{BacktestResult, PerformanceMetrics, Timestep};
use crate::error::CoreError;
use crate::time::{Interval, Timestamp};

/// Consumed: produces bars in strictly ascending timestamp order with no
/// duplicates, materialized synchronously (§5: "no suspension points in
/// the core; data loading is an external collaborator").
pub trait BarLoader {
    type Iter: Iterator<Item = Timestep>;

    fn load_timesteps(&self, symbols: &[Symbol], interval: Interval, range: (Timestamp, Timestamp)) -> Result<Self::Iter, CoreError>;
}

/// Consumed: supplies a ready-made `MultiTimeframeAnalysis` for a symbol as
/// of `anchor_timestamp`. Implementations are free to cache HTF series; the
/// core never assumes it must recompute one itself.
pub trait MultiTimeframeProvider {
    fn provide_analysis(&self, symbol: &Symbol, anchor_timestamp: Timestamp) -> Option<MultiTimeframeAnalysis>;
}

/// Exposed: idempotent on `(strategy_name, symbol_universe, range,
/// config_fingerprint)` — the `ConfigFingerprint` embedded in
/// `BacktestResult` already encodes that tuple (§3).
pub trait PersistenceSink {
    fn persist_result(&mut self, result: &BacktestResult, metrics: &PerformanceMetrics) -> Result<(), CoreError>;
}

/// Exposed: for live use; the backtester never calls this directly, it only
/// collects `GeneratedSignal`s internally.
pub trait SignalSink {
    fn emit_signal(&mut self, signal: &GeneratedSignal);
}

/// Exit codes for a thin command-runner driving the core (§6). The core
/// itself never calls `std::process::exit`; a binary crate maps a
/// `RunOutcome` to one of these before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    Other = 1,
    InvalidConfiguration = 2,
    MissingMandatorySymbolData = 3,
    Aborted = 4,
}

impl ExitCode {
    pub fn from_result(result: &Result<BacktestResult, CoreError>) -> Self {
        match result {
            Ok(r) if r.aborted => ExitCode::Aborted,
            Ok(_) => ExitCode::Success,
            Err(CoreError::Config(_)) => ExitCode::InvalidConfiguration,
            Err(CoreError::Execution(crate::error::ExecutionError::DataGap(_))) => ExitCode::MissingMandatorySymbolData,
            Err(_) => ExitCode::Other,
        }
    }
}
