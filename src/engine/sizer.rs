//! Confidence-scaled position sizing (§4.7.2 step 7).

use crate::engine::config::PortfolioConfig;
use crate::money::Price;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingDecision {
    pub quantity: Decimal,
    pub notional: Price,
}

/// `None` means the signal is rejected for sizing: either the risk-based
/// quantity rounds to zero, or the notional would exceed available cash.
pub fn size_position(
    equity: Price,
    cash: Price,
    entry_price: Price,
    stop_loss: Price,
    confidence: Decimal,
    commission_estimate: Price,
    config: &PortfolioConfig,
) -> Option<SizingDecision> {
    let per_unit_risk = (entry_price - stop_loss).abs();
    if per_unit_risk <= Decimal::ZERO {
        return None;
    }

    let risk_dollars = equity * config.risk_per_trade;
    let base_quantity = (risk_dollars / per_unit_risk).floor();
    let quantity = if config.confidence_scaling_enabled {
        (base_quantity * confidence).floor()
    } else {
        base_quantity
    };

    if quantity <= Decimal::ZERO {
        return None;
    }

    let notional = entry_price * quantity;
    if notional + commission_estimate > cash {
        return None;
    }

    Some(SizingDecision { quantity, notional })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn sizes_proportionally_to_risk_budget() {
        let config = PortfolioConfig::default();
        let decision = size_position(dec!(100_000), dec!(100_000), dec!(100), dec!(95), dec!(1), dec!(10), &config).unwrap();
        // risk_dollars = 2000, per_unit_risk = 5 -> base quantity 400
        assert_eq!(decision.quantity, dec!(400));
    }

    #[test]
    fn confidence_scaling_shrinks_quantity() {
        let config = PortfolioConfig::default();
        let decision = size_position(dec!(100_000), dec!(100_000), dec!(100), dec!(95), dec!(0.5), dec!(10), &config).unwrap();
        assert_eq!(decision.quantity, dec!(200));
    }

    #[test]
    fn insufficient_cash_rejects_the_signal() {
        let config = PortfolioConfig::default();
        let decision = size_position(dec!(100_000), dec!(100), dec!(100), dec!(95), dec!(1), dec!(10), &config);
        assert!(decision.is_none());
    }

    #[test]
    fn zero_risk_distance_rejects_the_signal() {
        let config = PortfolioConfig::default();
        let decision = size_position(dec!(100_000), dec!(100_000), dec!(100), dec!(100), dec!(1), dec!(10), &config);
        assert!(decision.is_none());
    }
}
