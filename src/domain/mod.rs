//! Domain types shared by the indicator engine, coordinator, signal
//! generator, and backtester.

pub mod alignment;
pub mod analysis;
pub mod bar;
pub mod confluence;
pub mod envelope;
pub mod ids;
pub mod pattern;
pub mod pldot;
pub mod portfolio;
pub mod position;
pub mod signal;
pub mod state;
pub mod timeframe;
pub mod trade;

pub use alignment::{AlignmentType, TimeframeAlignment};
pub use analysis::{HtfPosition, MultiTimeframeAnalysis, PldotOverlay, RecommendedAction, RiskLevel};
pub use bar::Bar;
pub use confluence::{ConfluenceZone, ZoneType};
pub use envelope::{EnvelopeConfig, EnvelopeMethod, EnvelopePoint};
pub use ids::ConfigFingerprint;
pub use pattern::{Direction, PatternEvent, PatternKind};
pub use pldot::PLdotPoint;
pub use portfolio::PortfolioSnapshot;
pub use position::{ClosingReason, Position, PositionSide, PositionState};
pub use signal::{GeneratedSignal, SignalMetadata, SignalType};
pub use state::{MarketState, MarketStateConfig, SlopeTrend, StatePoint, TrendDirection};
pub use timeframe::{Classification, TimeframeData};
pub use trade::Trade;

/// Symbol type alias.
pub type Symbol = String;
