//! Drummond Geometry core — indicator engine, multi-timeframe coordinator,
//! signal generator, and portfolio backtester.
//!
//! This crate contains the heart of the system:
//! - Domain types (bars, PLdot/envelope/state/pattern series, positions, trades)
//! - Indicator engine: PLdot projection, envelope bands, market-state classifier,
//!   pattern detectors
//! - Multi-timeframe coordinator: alignment scoring, confluence zones, composite
//!   signal strength
//! - Signal generator: entry/exit signal synthesis with stop/target placement
//! - Portfolio backtester: deterministic bar-by-bar event loop with intraday
//!   stop/target checks, confidence-scaled sizing, commission/slippage, and
//!   performance metrics

pub mod coordinator;
pub mod domain;
pub mod engine;
pub mod error;
pub mod external;
pub mod indicators;
pub mod money;
pub mod signal_generator;
pub mod time;

pub use error::CoreError;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: the types a multi-threaded embedding application
    /// must move across thread boundaries are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::bar::Bar>();
        require_sync::<domain::bar::Bar>();
        require_send::<domain::timeframe::TimeframeData>();
        require_sync::<domain::timeframe::TimeframeData>();
        require_send::<domain::analysis::MultiTimeframeAnalysis>();
        require_sync::<domain::analysis::MultiTimeframeAnalysis>();
        require_send::<domain::signal::GeneratedSignal>();
        require_sync::<domain::signal::GeneratedSignal>();
        require_send::<domain::position::Position>();
        require_sync::<domain::position::Position>();
        require_send::<engine::result::BacktestResult>();
        require_sync::<engine::result::BacktestResult>();
    }
}
