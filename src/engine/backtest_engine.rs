//! The event-driven backtest loop (§4.7.2, §5).
//!
//! Phase ordering within one timestep is fixed and never reordered:
//! 1. fill pending entries queued at the previous timestep's open
//! 2. intraday stop/target exits
//! 3. equity snapshot
//! 4. multi-timeframe analysis + signal generation
//! 5. filter + rank signals
//! 6. admission control (concurrent-position cap, one position per symbol)
//! 7. confidence-scaled sizing
//! 8. enqueue surviving entries for the next timestep's open

use crate::coordinator::{self, CoordinatorConfig, PriorOutcome};
use crate::domain::{ClosingReason, Position, PositionSide, PositionState, Symbol, Trade};
use crate::engine::bundle::SymbolBundle;
use crate::engine::config::PortfolioConfig;
use crate::engine::executor;
use crate::engine::metrics::PerformanceMetrics;
use crate::engine::order_book::{OrderBook, PendingEntry};
use crate::engine::position_manager::{IntradayExit, PositionManager};
use crate::engine::ranker;
use crate::engine::result::{per_symbol_stats, BacktestResult};
use crate::engine::sizer;
use crate::engine::timestep::Timestep;
use crate::error::EngineError;
use crate::money::Price;
use crate::signal_generator::{self, SignalGeneratorConfig};
use crate::time::Interval;
use rust_decimal::Decimal;
use std::collections::HashMap;

pub struct BacktestEngine<'a> {
    config: PortfolioConfig,
    coordinator_config: CoordinatorConfig,
    signal_config: SignalGeneratorConfig,
    trading_interval: Interval,
    bundles: &'a HashMap<Symbol, SymbolBundle>,
}

impl<'a> BacktestEngine<'a> {
    pub fn new(
        config: PortfolioConfig,
        coordinator_config: CoordinatorConfig,
        signal_config: SignalGeneratorConfig,
        trading_interval: Interval,
        bundles: &'a HashMap<Symbol, SymbolBundle>,
    ) -> Result<Self, EngineError> {
        config
            .validate()
            .map_err(|e| EngineError::InternalInvariant(e.to_string()))?;
        Ok(Self { config, coordinator_config, signal_config, trading_interval, bundles })
    }

    pub fn run(&self, timesteps: &[Timestep], config_fingerprint: crate::domain::ConfigFingerprint) -> BacktestResult {
        tracing::info!(timestep_count = timesteps.len(), fingerprint = %config_fingerprint, "backtest run starting");
        let mut manager = PositionManager::new(self.config.initial_capital, self.config.price_rounding);
        let mut order_book = OrderBook::new();
        let mut equity_curve = Vec::with_capacity(timesteps.len());
        let mut peak_equity = self.config.initial_capital;
        let mut last_close: HashMap<Symbol, Price> = HashMap::new();
        let mut prior_outcomes: HashMap<Symbol, PriorOutcome> = HashMap::new();
        let mut aborted = false;

        for step in timesteps {
            // 1. Execute pending entries queued at the previous timestep.
            let pending = order_book.drain();
            for entry in pending {
                let Some(bar) = step.bars.get(&entry.symbol) else {
                    // Missing bar: re-queue, try again next timestep.
                    tracing::warn!(symbol = %entry.symbol, timestamp = %step.timestamp, "data gap: re-queueing pending entry");
                    order_book.enqueue(entry);
                    continue;
                };
                if manager.has_position(&entry.symbol) {
                    continue;
                }
                if manager.open_position_count() as u32 >= self.config.max_concurrent_positions {
                    tracing::warn!(symbol = %entry.symbol, "order rejected: max concurrent positions reached");
                    continue;
                }
                if entry.side == PositionSide::Short && !self.config.allow_short {
                    continue;
                }

                let fill = executor::compute_entry_fill(bar.open, entry.side, Decimal::ONE, &self.config);
                if executor::entry_violates_stop(fill.price, entry.side, entry.stop_loss) {
                    tracing::warn!(symbol = %entry.symbol, fill_price = %fill.price, stop = %entry.stop_loss, "order rejected: fill already past stop");
                    continue;
                }

                let equity = manager.cash + manager.positions_value(&last_close);
                let commission_estimate = fill.price * self.config.commission_rate;
                let Some(sizing) = sizer::size_position(
                    equity,
                    manager.cash,
                    fill.price,
                    entry.stop_loss,
                    entry.confidence,
                    commission_estimate,
                    &self.config,
                ) else {
                    tracing::warn!(symbol = %entry.symbol, cash = %manager.cash, "order rejected: sizing produced no viable quantity");
                    continue;
                };

                let real_fill = executor::compute_entry_fill(bar.open, entry.side, sizing.quantity, &self.config);
                let cash_delta = match entry.side {
                    PositionSide::Long => -(real_fill.price * sizing.quantity + real_fill.commission),
                    PositionSide::Short => real_fill.price * sizing.quantity - real_fill.commission,
                };
                if matches!(entry.side, PositionSide::Long) && -cash_delta > manager.cash {
                    continue;
                }

                let position = Position {
                    symbol: entry.symbol.clone(),
                    side: entry.side,
                    quantity: sizing.quantity,
                    entry_price: real_fill.price,
                    entry_time: step.timestamp,
                    entry_commission: real_fill.commission,
                    stop_loss: Some(entry.stop_loss),
                    take_profit: Some(entry.take_profit),
                    confidence: Some(entry.confidence),
                    notes: String::new(),
                    state: PositionState::Idle,
                };
                // manager.open() drives Idle -> Pending -> Open itself.
                tracing::debug!(symbol = %entry.symbol, side = ?entry.side, price = %real_fill.price, quantity = %sizing.quantity, "entry filled");
                manager.open(position, cash_delta);
            }

            // 2. Intraday stop/target exits.
            let symbols_with_positions: Vec<Symbol> = manager.positions().map(|(s, _)| s.clone()).collect();
            for symbol in symbols_with_positions {
                let Some(bar) = step.bars.get(&symbol) else { continue };
                let Some(exit) = manager.check_intraday_exit(&symbol, bar) else { continue };
                let position = manager.position(&symbol).expect("checked above");
                let level = match exit {
                    IntradayExit::Stop => position.stop_loss.expect("stop checked present"),
                    IntradayExit::Target => position.take_profit.expect("target checked present"),
                };
                let side = position.side;
                let quantity = position.quantity;
                let raw_price = executor::intraday_exit_price(bar, side, level);
                let fill = executor::compute_exit_fill(raw_price, side, quantity, &self.config);
                let reason = match exit {
                    IntradayExit::Stop => ClosingReason::Stop,
                    IntradayExit::Target => ClosingReason::Target,
                };
                if let Some(trade) = manager.close(&symbol, step.timestamp, fill.price, fill.commission, fill.slippage, reason) {
                    tracing::info!(symbol = %symbol, reason = ?reason, net_pnl = %trade.net_pnl, "trade closed");
                }
            }

            // Update last-known close for void-bar equity carry-forward.
            for (symbol, bar) in &step.bars {
                last_close.insert(symbol.clone(), bar.close);
            }

            // 3. Equity snapshot, taken after exits and before new entries.
            let positions_value = manager.positions_value(&last_close);
            let equity = manager.cash + positions_value;
            if equity > peak_equity {
                peak_equity = equity;
            }
            equity_curve.push(crate::domain::PortfolioSnapshot::new(step.timestamp, manager.cash, positions_value, peak_equity));

            // 4. Generate signals per symbol.
            let mut generated = Vec::new();
            for symbol in step.symbols() {
                let Some(bundle) = self.bundles.get(symbol) else { continue };
                let Some(bar) = step.bars.get(symbol) else { continue };

                let trading_asof = bundle.trading.as_of(bar.timestamp);
                let htf_asof = bundle.htf.as_of(bar.timestamp);
                let ltf_asof = bundle.ltf.as_ref().map(|l| l.as_of(bar.timestamp));

                if trading_asof.latest_state().is_none() || htf_asof.latest_state().is_none() {
                    // Per-symbol insufficient-history error: that symbol
                    // contributes no signal this timestep, others proceed.
                    tracing::warn!(symbol = %symbol, "insufficient history for analysis, skipping signal this step");
                    continue;
                }

                let prior = prior_outcomes.get(symbol).copied();
                let analysis = match coordinator::analyze(&htf_asof, &trading_asof, ltf_asof.as_ref(), &self.coordinator_config, prior) {
                    Ok(analysis) => analysis,
                    Err(err) => {
                        tracing::warn!(symbol = %symbol, error = %err, "coordinator analysis failed, skipping symbol this step");
                        continue;
                    }
                };
                prior_outcomes.insert(
                    symbol.clone(),
                    PriorOutcome { recommended_action: analysis.recommended_action, alignment_type: analysis.alignment.alignment_type },
                );

                let held_side = manager.side_of(symbol);
                if let Some(mut signal) = signal_generator::generate_signal(&analysis, &trading_asof, held_side, &self.signal_config) {
                    signal.symbol = symbol.clone();
                    generated.push(signal);
                }
            }

            // Resolve exit signals (Reduce -> ExitLong/ExitShort) immediately
            // at this bar's close; they never enter the pending-order queue.
            generated.retain(|signal| {
                let is_exit = matches!(
                    signal.signal_type,
                    crate::domain::SignalType::ExitLong | crate::domain::SignalType::ExitShort
                );
                if is_exit {
                    if let Some(bar) = step.bars.get(&signal.symbol) {
                        if let Some(position) = manager.position(&signal.symbol) {
                            let side = position.side;
                            let quantity = position.quantity;
                            let fill = executor::compute_exit_fill(bar.close, side, quantity, &self.config);
                            manager.close(&signal.symbol, step.timestamp, fill.price, fill.commission, fill.slippage, ClosingReason::Signal);
                        }
                    }
                    false
                } else {
                    true
                }
            });

            // 5. Filter + rank directional entry signals.
            let ranked = ranker::filter_and_rank(generated, &self.config);

            // 6-7. Admission control + sizing, enqueuing surviving entries.
            let mut slots_used = manager.open_position_count() as u32;
            for candidate in ranked {
                let symbol = candidate.signal.symbol.clone();
                if manager.has_position(&symbol) || order_book_has(&order_book, &symbol) {
                    continue;
                }
                if slots_used >= self.config.max_concurrent_positions {
                    continue;
                }
                let side = match candidate.signal.signal_type {
                    crate::domain::SignalType::Long => PositionSide::Long,
                    crate::domain::SignalType::Short => PositionSide::Short,
                    _ => continue,
                };
                if side == PositionSide::Short && !self.config.allow_short {
                    continue;
                }

                // 8. Enqueue for next timestep's open fill.
                order_book.enqueue(PendingEntry {
                    symbol: symbol.clone(),
                    side,
                    stop_loss: candidate.signal.stop_loss,
                    take_profit: candidate.signal.take_profit,
                    confidence: candidate.signal.confidence,
                    queued_at: step.timestamp,
                });
                slots_used += 1;
            }

            if equity <= Decimal::ZERO {
                tracing::error!(timestamp = %step.timestamp, equity = %equity, "internal invariant violated: equity exhausted, aborting run");
                aborted = true;
                break;
            }
        }

        let trades: Vec<Trade> = manager.trades().to_vec();
        let metrics = PerformanceMetrics::compute(
            &equity_curve.iter().map(|s| s.equity).collect::<Vec<_>>(),
            &trades,
            self.trading_interval,
        );
        tracing::info!(trade_count = trades.len(), aborted, final_equity = %equity_curve.last().map(|s| s.equity).unwrap_or_default(), "backtest run finished");
        let stats = per_symbol_stats(&trades);

        BacktestResult {
            trades,
            equity_curve,
            per_symbol_stats: stats,
            config_fingerprint,
            metrics,
            aborted,
        }
    }
}

fn order_book_has(order_book: &OrderBook, symbol: &str) -> bool {
    order_book.contains(symbol)
}
