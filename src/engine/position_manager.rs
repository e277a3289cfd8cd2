//! Position manager — exclusive owner of cash, open positions, and closed
//! trades (§4.7.2: "all mutations of cash, positions, and trades happen
//! under the position manager's exclusive ownership").

use crate::domain::{Bar, ClosingReason, Position, PositionSide, PositionState, Symbol, Trade};
use crate::money::{round_price, Price};
use rust_decimal::Decimal;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct PositionManager {
    pub cash: Price,
    positions: HashMap<Symbol, Position>,
    trades: Vec<Trade>,
    price_rounding: u32,
}

/// The outcome of an intraday stop/target sweep for one symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntradayExit {
    Stop,
    Target,
}

impl PositionManager {
    pub fn new(initial_capital: Price, price_rounding: u32) -> Self {
        Self {
            cash: initial_capital,
            positions: HashMap::new(),
            trades: Vec::new(),
            price_rounding,
        }
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub fn has_position(&self, symbol: &str) -> bool {
        self.positions.contains_key(symbol)
    }

    pub fn open_position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn positions(&self) -> impl Iterator<Item = (&Symbol, &Position)> {
        self.positions.iter()
    }

    pub fn side_of(&self, symbol: &str) -> Option<PositionSide> {
        self.positions.get(symbol).map(|p| p.side)
    }

    /// Apply `cash_delta` (negative for a long's debit, positive for a
    /// short's sale proceeds net of commission) and record the new open
    /// position. The sizer/executor compute `cash_delta`; the manager just
    /// applies it atomically with the position insert.
    ///
    /// Drives the position's lifecycle state through `Idle -> Pending ->
    /// Open` (§4.7.3), collapsed into one call since this engine has no
    /// intrabar partial-fill model.
    pub fn open(&mut self, mut position: Position, cash_delta: Price) {
        position.state = position
            .state
            .transition(PositionState::Pending)
            .and_then(|s| s.transition(PositionState::Open))
            .expect("open() requires a freshly constructed Idle position");
        self.cash += cash_delta;
        self.positions.insert(position.symbol.clone(), position);
    }

    /// Close a position at `exit_price`, settling cash and recording a
    /// `Trade`. Returns the realized trade.
    ///
    /// Drives the position's lifecycle state through `Open ->
    /// Closing(reason) -> Closed` (§4.7.3) before it is discarded; an
    /// already-closing or already-closed position can never reach here
    /// because `close()` removes it from the open-position map on its only
    /// call.
    pub fn close(
        &mut self,
        symbol: &str,
        exit_time: crate::time::Timestamp,
        exit_price: Price,
        exit_commission: Price,
        slippage: Price,
        reason: ClosingReason,
    ) -> Option<Trade> {
        let mut position = self.positions.remove(symbol)?;
        position.state = position
            .state
            .transition(PositionState::Closing(reason))
            .and_then(|s| s.transition(PositionState::Closed))
            .expect("close() requires an Open position");
        let exit_price = round_price(exit_price, self.price_rounding);
        let gross_pnl = match position.side {
            PositionSide::Long => (exit_price - position.entry_price) * position.quantity,
            PositionSide::Short => (position.entry_price - exit_price) * position.quantity,
        };
        let net_pnl = gross_pnl - position.entry_commission - exit_commission;
        // Long exit sells the shares: credit proceeds net of commission.
        // Short exit buys the shares back: debit cost plus commission.
        let cash_delta = match position.side {
            PositionSide::Long => exit_price * position.quantity - exit_commission,
            PositionSide::Short => -(exit_price * position.quantity) - exit_commission,
        };
        self.cash += cash_delta;

        let trade = Trade {
            symbol: symbol.to_string(),
            side: position.side,
            entry_time: position.entry_time,
            entry_price: position.entry_price,
            entry_commission: position.entry_commission,
            exit_time,
            exit_price,
            exit_commission,
            closing_reason: reason,
            quantity: position.quantity,
            gross_pnl,
            net_pnl,
            slippage,
            duration_seconds: (exit_time - position.entry_time).num_seconds(),
        };
        self.trades.push(trade.clone());
        Some(trade)
    }

    /// Intraday stop/target sweep for one symbol's bar (§4.7.2 step 2).
    /// Stop is checked before target — a bar that touches both in the same
    /// session exits at the stop (pessimistic tie resolution).
    pub fn check_intraday_exit(&self, symbol: &str, bar: &Bar) -> Option<IntradayExit> {
        let position = self.positions.get(symbol)?;
        match position.side {
            PositionSide::Long => {
                if let Some(stop) = position.stop_loss {
                    if bar.low <= stop {
                        return Some(IntradayExit::Stop);
                    }
                }
                if let Some(target) = position.take_profit {
                    if bar.high >= target {
                        return Some(IntradayExit::Target);
                    }
                }
            }
            PositionSide::Short => {
                if let Some(stop) = position.stop_loss {
                    if bar.high >= stop {
                        return Some(IntradayExit::Stop);
                    }
                }
                if let Some(target) = position.take_profit {
                    if bar.low <= target {
                        return Some(IntradayExit::Target);
                    }
                }
            }
        }
        None
    }

    pub fn positions_value(&self, prices: &HashMap<Symbol, Price>) -> Price {
        self.positions
            .values()
            .map(|p| {
                let price = prices.get(&p.symbol).copied().unwrap_or(p.entry_price);
                p.market_value(price)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn bar(low: Decimal, high: Decimal) -> Bar {
        Bar::new(Utc.timestamp_opt(0, 0).unwrap(), dec!(100), high, low, dec!(100), dec!(1000)).unwrap()
    }

    fn long_position() -> Position {
        Position {
            symbol: "AAA".to_string(),
            side: PositionSide::Long,
            quantity: dec!(10),
            entry_price: dec!(100),
            entry_time: Utc.timestamp_opt(0, 0).unwrap(),
            entry_commission: dec!(1),
            stop_loss: Some(dec!(95)),
            take_profit: Some(dec!(110)),
            confidence: Some(dec!(0.7)),
            notes: String::new(),
            state: PositionState::Idle,
        }
    }

    #[test]
    fn stop_is_checked_before_target_on_same_bar() {
        let mut manager = PositionManager::new(dec!(100_000), 2);
        manager.open(long_position(), dec!(-1001));
        let touching_both = bar(dec!(90), dec!(120));
        assert_eq!(manager.check_intraday_exit("AAA", &touching_both), Some(IntradayExit::Stop));
    }

    #[test]
    fn open_drives_position_to_the_open_state() {
        let mut manager = PositionManager::new(dec!(100_000), 2);
        manager.open(long_position(), dec!(-1001));
        assert_eq!(manager.position("AAA").unwrap().state, PositionState::Open);
    }

    #[test]
    #[should_panic(expected = "open() requires a freshly constructed Idle position")]
    fn open_rejects_a_position_not_starting_from_idle() {
        let mut manager = PositionManager::new(dec!(100_000), 2);
        let mut already_open = long_position();
        already_open.state = PositionState::Open;
        manager.open(already_open, dec!(-1001));
    }

    #[test]
    fn close_credits_cash_and_records_trade() {
        let mut manager = PositionManager::new(dec!(100_000), 2);
        manager.cash = dec!(98_999);
        manager.open(long_position(), dec!(0));
        let trade = manager
            .close("AAA", Utc.timestamp_opt(3600, 0).unwrap(), dec!(110), dec!(1), dec!(0.05), ClosingReason::Target)
            .unwrap();
        assert!(trade.net_pnl > Decimal::ZERO);
        assert!(!manager.has_position("AAA"));
        assert_eq!(manager.trades().len(), 1);
        assert_eq!(trade.slippage, dec!(0.05));
    }
}
