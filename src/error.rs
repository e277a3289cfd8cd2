//! Error taxonomy.
//!
//! Each subsystem owns a `thiserror`-derived enum naming the kinds of §7 that
//! can occur at its surface. `CoreError` wraps them for call sites that cross
//! module boundaries. Recoverable kinds (`OrderRejected`, `DataGap`,
//! per-symbol `InsufficientHistory`) are caught at the step boundary by the
//! caller and never propagate past it; fatal kinds are returned to the top.

use thiserror::Error;

/// Errors raised while computing an indicator series (PLdot, envelope, state,
/// patterns) from bar/point history.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    /// Fewer bars than a calculator requires (e.g. PLdot needs 3).
    #[error("insufficient history: need at least {required} bars, got {available}")]
    InsufficientHistory { required: usize, available: usize },

    /// Two or more aligned series (bars/PLdot/envelope) disagree on timestamps.
    #[error("alignment error: {0}")]
    AlignmentError(String),
}

/// Errors raised validating configuration at startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Errors raised while executing orders or generating signals for one symbol
/// at one timestep. All variants are recovered locally by the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("order rejected: {0}")]
    OrderRejected(String),

    #[error("data gap: symbol '{0}' missing at timestep")]
    DataGap(String),
}

/// A broken internal invariant. Always fatal — the run is aborted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

/// Top-level error type for call sites that cross subsystem boundaries.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
