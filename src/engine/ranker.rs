//! Signal filtering and ranking (§4.7.2 step 5).
//!
//! Signals below `min_signal_confidence` are discarded; survivors are
//! ranked by a weighted composite so admission control (step 6) takes the
//! strongest candidates first when concurrent-position capacity is tight.

use crate::domain::GeneratedSignal;
use crate::engine::config::PortfolioConfig;
use crate::money::clamp01;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[derive(Debug, Clone)]
pub struct RankedSignal {
    pub signal: GeneratedSignal,
    pub rank_score: Decimal,
}

pub fn filter_and_rank(signals: Vec<GeneratedSignal>, config: &PortfolioConfig) -> Vec<RankedSignal> {
    let mut ranked: Vec<RankedSignal> = signals
        .into_iter()
        .filter(|s| s.confidence >= config.min_signal_confidence)
        .map(|signal| {
            let rank_score = composite_score(&signal);
            RankedSignal { signal, rank_score }
        })
        .collect();

    // Stable sort on (score desc, symbol asc) keeps ranking deterministic
    // when two signals tie exactly, matching the lexicographic ordering
    // the rest of the engine relies on.
    ranked.sort_by(|a, b| {
        b.rank_score
            .cmp(&a.rank_score)
            .then_with(|| a.signal.symbol.cmp(&b.signal.symbol))
    });
    ranked
}

fn composite_score(signal: &GeneratedSignal) -> Decimal {
    let confluence_component = clamp01(Decimal::from(signal.metadata.confluence_count.min(5)) / dec!(5));
    let pattern_component = if signal.metadata.pattern_kinds.is_empty() {
        Decimal::ZERO
    } else {
        Decimal::ONE
    };
    // §9: no volatility feed is defined at this layer, so the volatility
    // component defaults to zero rather than guessing a proxy.
    let volatility_component = signal.metadata.extra_component("volatility");

    clamp01(
        dec!(0.5) * signal.confidence
            + dec!(0.25) * confluence_component
            + dec!(0.15) * pattern_component
            + dec!(0.1) * volatility_component,
    )
}
