//! Fixed-point decimal arithmetic shared across the crate.
//!
//! All monetary and price quantities use `rust_decimal::Decimal` rather than
//! `f64` to avoid floating-point drift in accumulated cash/equity
//! bookkeeping (§9 "Decimal arithmetic"). Floating point is reserved for
//! ratios, confidences, and the Sharpe/Sortino statistics, which are
//! computed from already-scaled returns (§4.7.5).

use rust_decimal::{Decimal, MathematicalOps};

/// A price or money quantity.
pub type Price = Decimal;

/// A ratio/score/confidence in `[0, 1]` unless documented otherwise.
pub type Ratio = Decimal;

/// Clamp a decimal into `[0, 1]`.
pub fn clamp01(value: Decimal) -> Decimal {
    if value < Decimal::ZERO {
        Decimal::ZERO
    } else if value > Decimal::ONE {
        Decimal::ONE
    } else {
        value
    }
}

/// Round a price to `places` fractional digits using banker's-adjacent
/// half-up rounding, matching `PortfolioConfig::price_rounding` (§4.7.1).
pub fn round_price(value: Decimal, places: u32) -> Decimal {
    value.round_dp(places)
}

/// Sample standard deviation of a decimal slice (population of size `n`,
/// divisor `n`, matching the envelope's `stddev` definition in §4.2 — not
/// Bessel-corrected). Returns `Decimal::ZERO` for fewer than 2 values.
pub fn stddev(values: &[Decimal]) -> Decimal {
    let n = values.len();
    if n == 0 {
        return Decimal::ZERO;
    }
    let n_dec = Decimal::from(n as u64);
    let mean = values.iter().sum::<Decimal>() / n_dec;
    let sum_sq: Decimal = values.iter().map(|v| (*v - mean) * (*v - mean)).sum();
    let variance = sum_sq / n_dec;
    decimal_sqrt(variance)
}

/// Decimal square root via the `maths` feature, falling back to zero for
/// negative inputs (which should not occur for a variance).
pub fn decimal_sqrt(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    value.sqrt().unwrap_or(Decimal::ZERO)
}
