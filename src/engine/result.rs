//! Backtest output (§3): trades, equity curve, per-symbol stats, identity.

use crate::domain::{ConfigFingerprint, PortfolioSnapshot, Symbol, Trade};
use crate::engine::metrics::PerformanceMetrics;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct SymbolStats {
    pub trade_count: usize,
    pub net_pnl: crate::money::Price,
    pub win_rate: crate::money::Ratio,
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<PortfolioSnapshot>,
    pub per_symbol_stats: HashMap<Symbol, SymbolStats>,
    pub config_fingerprint: ConfigFingerprint,
    pub metrics: PerformanceMetrics,
    /// True if the run stopped before its configured end — either the data
    /// source was exhausted early or the caller cancelled it (§5).
    pub aborted: bool,
}

pub fn per_symbol_stats(trades: &[Trade]) -> HashMap<Symbol, SymbolStats> {
    let mut grouped: HashMap<Symbol, Vec<&Trade>> = HashMap::new();
    for trade in trades {
        grouped.entry(trade.symbol.clone()).or_default().push(trade);
    }

    grouped
        .into_iter()
        .map(|(symbol, trades)| {
            let trade_count = trades.len();
            let net_pnl = trades.iter().map(|t| t.net_pnl).sum();
            let winners = trades.iter().filter(|t| t.is_winner()).count();
            let win_rate = if trade_count == 0 {
                crate::money::Ratio::ZERO
            } else {
                rust_decimal::Decimal::from(winners) / rust_decimal::Decimal::from(trade_count)
            };
            (symbol, SymbolStats { trade_count, net_pnl, win_rate })
        })
        .collect()
}
