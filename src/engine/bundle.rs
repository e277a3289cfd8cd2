//! Per-symbol precomputed indicator bundle (§4.7.2), built once up front so
//! the event loop only has to truncate-and-read, never recompute, series.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::domain::{Bar, Classification, EnvelopeConfig, MarketStateConfig, Symbol, TimeframeData};
use crate::error::IndicatorError;
use crate::indicators::build_timeframe_data;
use crate::time::Interval;

#[derive(Debug, Clone)]
pub struct SymbolBundle {
    pub htf: TimeframeData,
    pub trading: TimeframeData,
    pub ltf: Option<TimeframeData>,
}

/// Raw per-symbol bar history for each timeframe a bundle needs.
#[derive(Debug, Clone)]
pub struct SymbolBars {
    pub htf_bars: Vec<Bar>,
    pub trading_bars: Vec<Bar>,
    pub ltf_bars: Option<Vec<Bar>>,
}

pub fn build_bundle(
    bars: &SymbolBars,
    htf_interval: Interval,
    trading_interval: Interval,
    ltf_interval: Option<Interval>,
    envelope_config: &EnvelopeConfig,
    state_config: &MarketStateConfig,
) -> Result<SymbolBundle, IndicatorError> {
    let htf = build_timeframe_data(htf_interval, Classification::Higher, bars.htf_bars.clone(), envelope_config, state_config)?;
    let trading =
        build_timeframe_data(trading_interval, Classification::Trading, bars.trading_bars.clone(), envelope_config, state_config)?;
    let ltf = match (&bars.ltf_bars, ltf_interval) {
        (Some(b), Some(interval)) => {
            Some(build_timeframe_data(interval, Classification::Lower, b.clone(), envelope_config, state_config)?)
        }
        _ => None,
    };
    Ok(SymbolBundle { htf, trading, ltf })
}

/// Builds one bundle per symbol in the universe. Each symbol's three
/// timeframe computations are independent of every other symbol's, so a
/// large universe is built across a rayon thread pool rather than one
/// symbol at a time.
pub fn build_bundles_parallel(
    per_symbol: &HashMap<Symbol, SymbolBars>,
    htf_interval: Interval,
    trading_interval: Interval,
    ltf_interval: Option<Interval>,
    envelope_config: &EnvelopeConfig,
    state_config: &MarketStateConfig,
) -> Result<HashMap<Symbol, SymbolBundle>, IndicatorError> {
    per_symbol
        .par_iter()
        .map(|(symbol, bars)| {
            let bundle = build_bundle(bars, htf_interval, trading_interval, ltf_interval, envelope_config, state_config)?;
            Ok((symbol.clone(), bundle))
        })
        .collect()
}
