//! Aggregate performance metrics computed from an equity curve and trade
//! list (§4.7.5). Every metric is a pure function over already-computed
//! inputs; this module owns no engine state.

use crate::domain::Trade;
use crate::money::{decimal_sqrt, stddev, Price};
use crate::time::Interval;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Gross profit over gross loss. Represented explicitly rather than as a
/// capped float: a strategy with zero losing trades has no meaningful
/// finite profit factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProfitFactor {
    Finite(Decimal),
    Infinite,
    Undefined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_return: Decimal,
    pub annualized_return: Decimal,
    pub sharpe: Decimal,
    pub sortino: Decimal,
    pub max_drawdown: Decimal,
    pub win_rate: Decimal,
    pub profit_factor: ProfitFactor,
    pub avg_win: Price,
    pub avg_loss: Price,
    pub trade_count: usize,
}

impl PerformanceMetrics {
    pub fn compute(equity_curve: &[Price], trades: &[Trade], interval: Interval) -> Self {
        Self {
            total_return: total_return(equity_curve),
            annualized_return: annualized_return(equity_curve, interval),
            sharpe: sharpe_ratio(equity_curve, interval),
            sortino: sortino_ratio(equity_curve, interval),
            max_drawdown: max_drawdown(equity_curve),
            win_rate: win_rate(trades),
            profit_factor: profit_factor(trades),
            avg_win: avg_win(trades),
            avg_loss: avg_loss(trades),
            trade_count: trades.len(),
        }
    }
}

pub fn total_return(equity_curve: &[Price]) -> Decimal {
    let (Some(&first), Some(&last)) = (equity_curve.first(), equity_curve.last()) else {
        return Decimal::ZERO;
    };
    if first <= Decimal::ZERO || equity_curve.len() < 2 {
        return Decimal::ZERO;
    }
    (last - first) / first
}

/// Annualizes the total return using the interval's periods-per-year and
/// the number of periods actually observed, rather than compounding a
/// power (`rust_decimal` has no fractional-exponent `powf`): a linear
/// scale-by-years approximation, exact for single-year runs.
pub fn annualized_return(equity_curve: &[Price], interval: Interval) -> Decimal {
    if equity_curve.len() < 2 {
        return Decimal::ZERO;
    }
    let periods = Decimal::from(equity_curve.len() - 1);
    let periods_per_year = interval.periods_per_year_decimal();
    if periods <= Decimal::ZERO || periods_per_year <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let years = periods / periods_per_year;
    if years <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    total_return(equity_curve) / years
}

pub fn period_returns(equity_curve: &[Price]) -> Vec<Decimal> {
    if equity_curve.len() < 2 {
        return Vec::new();
    }
    equity_curve
        .windows(2)
        .map(|w| if w[0] > Decimal::ZERO { (w[1] - w[0]) / w[0] } else { Decimal::ZERO })
        .collect()
}

pub fn sharpe_ratio(equity_curve: &[Price], interval: Interval) -> Decimal {
    let returns = period_returns(equity_curve);
    if returns.len() < 2 {
        return Decimal::ZERO;
    }
    let mean = mean(&returns);
    let std = stddev(&returns);
    if std == Decimal::ZERO {
        return Decimal::ZERO;
    }
    (mean / std) * decimal_sqrt(interval.periods_per_year_decimal())
}

pub fn sortino_ratio(equity_curve: &[Price], interval: Interval) -> Decimal {
    let returns = period_returns(equity_curve);
    if returns.len() < 2 {
        return Decimal::ZERO;
    }
    let mean = mean(&returns);
    let downside: Vec<Decimal> = returns.iter().copied().filter(|r| *r < Decimal::ZERO).collect();
    if downside.is_empty() {
        return Decimal::ZERO;
    }
    let downside_variance = downside.iter().map(|r| r * r).sum::<Decimal>() / Decimal::from(returns.len());
    let downside_std = decimal_sqrt(downside_variance);
    if downside_std == Decimal::ZERO {
        return Decimal::ZERO;
    }
    (mean / downside_std) * decimal_sqrt(interval.periods_per_year_decimal())
}

pub fn max_drawdown(equity_curve: &[Price]) -> Decimal {
    if equity_curve.len() < 2 {
        return Decimal::ZERO;
    }
    let mut peak = equity_curve[0];
    let mut worst = Decimal::ZERO;
    for &equity in equity_curve {
        if equity > peak {
            peak = equity;
        }
        if peak > Decimal::ZERO {
            let drawdown = (peak - equity) / peak;
            if drawdown > worst {
                worst = drawdown;
            }
        }
    }
    worst
}

pub fn win_rate(trades: &[Trade]) -> Decimal {
    if trades.is_empty() {
        return Decimal::ZERO;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    Decimal::from(winners) / Decimal::from(trades.len())
}

pub fn profit_factor(trades: &[Trade]) -> ProfitFactor {
    if trades.is_empty() {
        return ProfitFactor::Undefined;
    }
    let gross_profit: Decimal = trades.iter().filter(|t| t.net_pnl > Decimal::ZERO).map(|t| t.net_pnl).sum();
    let gross_loss: Decimal = trades.iter().filter(|t| t.net_pnl < Decimal::ZERO).map(|t| t.net_pnl.abs()).sum();
    if gross_loss == Decimal::ZERO {
        return if gross_profit > Decimal::ZERO { ProfitFactor::Infinite } else { ProfitFactor::Undefined };
    }
    ProfitFactor::Finite(gross_profit / gross_loss)
}

pub fn avg_win(trades: &[Trade]) -> Price {
    let winners: Vec<Decimal> = trades.iter().filter(|t| t.is_winner()).map(|t| t.net_pnl).collect();
    if winners.is_empty() {
        return Decimal::ZERO;
    }
    winners.iter().sum::<Decimal>() / Decimal::from(winners.len())
}

pub fn avg_loss(trades: &[Trade]) -> Price {
    let losers: Vec<Decimal> = trades.iter().filter(|t| !t.is_winner()).map(|t| t.net_pnl).collect();
    if losers.is_empty() {
        return Decimal::ZERO;
    }
    losers.iter().sum::<Decimal>() / Decimal::from(losers.len())
}

fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().sum::<Decimal>() / Decimal::from(values.len())
}
