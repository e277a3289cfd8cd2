//! Fill price computation (§4.7.2 step 1): applies slippage, rounding, and
//! commission to a raw open price to produce the final fill.

use crate::domain::{Bar, PositionSide};
use crate::engine::config::PortfolioConfig;
use crate::money::{round_price, Price};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedFill {
    pub price: Price,
    pub slippage: Price,
    pub commission: Price,
}

/// Buy fills above the raw open, sell fills below it — slippage always
/// costs the trader money, never helps.
pub fn compute_entry_fill(raw_open: Price, side: PositionSide, quantity: Decimal, config: &PortfolioConfig) -> ComputedFill {
    compute_fill(raw_open, is_buy(side), quantity, config)
}

/// An exit sells out of a long (receives less) or buys back a short (pays
/// more); the buy/sell direction is the opposite of the position's side.
pub fn compute_exit_fill(raw_price: Price, side: PositionSide, quantity: Decimal, config: &PortfolioConfig) -> ComputedFill {
    compute_fill(raw_price, !is_buy(side), quantity, config)
}

fn is_buy(side: PositionSide) -> bool {
    matches!(side, PositionSide::Long)
}

fn compute_fill(raw_price: Price, is_buy: bool, quantity: Decimal, config: &PortfolioConfig) -> ComputedFill {
    let slippage_fraction = config.slippage_fraction();
    let slipped = if is_buy {
        raw_price * (Decimal::ONE + slippage_fraction)
    } else {
        raw_price * (Decimal::ONE - slippage_fraction)
    };
    let price = round_price(slipped, config.price_rounding);
    let slippage = (price - raw_price).abs() * quantity;
    let commission = price * quantity * config.commission_rate;

    ComputedFill { price, slippage, commission }
}

/// An entry order is cancelled if, after slippage, the fill price would
/// already be on the wrong side of the stop (§4.7.4 failure semantics).
pub fn entry_violates_stop(fill_price: Price, side: PositionSide, stop_loss: Price) -> bool {
    match side {
        PositionSide::Long => fill_price <= stop_loss,
        PositionSide::Short => fill_price >= stop_loss,
    }
}

/// The raw intraday exit price actually realized: stop exits at the stop
/// level (not the bar extreme), target exits at the target level, both
/// clamped to what the bar could plausibly print.
pub fn intraday_exit_price(bar: &Bar, side: PositionSide, level: Price) -> Price {
    match side {
        PositionSide::Long => level.clamp(bar.low, bar.high),
        PositionSide::Short => level.clamp(bar.low, bar.high),
    }
}
