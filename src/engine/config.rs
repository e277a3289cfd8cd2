//! Portfolio backtester configuration (§4.7.1).

use crate::error::ConfigError;
use crate::money::Price;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    pub initial_capital: Price,
    pub commission_rate: Decimal,
    pub slippage_bps: Decimal,
    pub risk_per_trade: Decimal,
    pub min_signal_confidence: Decimal,
    pub confidence_scaling_enabled: bool,
    pub allow_short: bool,
    pub max_concurrent_positions: u32,
    pub price_rounding: u32,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            initial_capital: dec!(100_000),
            commission_rate: dec!(0.001),
            slippage_bps: dec!(10),
            risk_per_trade: dec!(0.02),
            min_signal_confidence: dec!(0.5),
            confidence_scaling_enabled: true,
            allow_short: false,
            max_concurrent_positions: 5,
            price_rounding: 2,
        }
    }
}

impl PortfolioConfig {
    /// Fail fast on an invalid configuration (§7 `InvalidConfiguration` —
    /// fatal at startup, never surfaced mid-run).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capital <= Decimal::ZERO {
            return Err(ConfigError::InvalidConfiguration(
                "initial_capital must be > 0".to_string(),
            ));
        }
        if self.commission_rate < Decimal::ZERO {
            return Err(ConfigError::InvalidConfiguration(
                "commission_rate must be >= 0".to_string(),
            ));
        }
        if self.slippage_bps < Decimal::ZERO {
            return Err(ConfigError::InvalidConfiguration(
                "slippage_bps must be >= 0".to_string(),
            ));
        }
        if self.risk_per_trade <= Decimal::ZERO || self.risk_per_trade > Decimal::ONE {
            return Err(ConfigError::InvalidConfiguration(
                "risk_per_trade must be in (0, 1]".to_string(),
            ));
        }
        if self.min_signal_confidence < Decimal::ZERO || self.min_signal_confidence > Decimal::ONE {
            return Err(ConfigError::InvalidConfiguration(
                "min_signal_confidence must be in [0, 1]".to_string(),
            ));
        }
        if self.max_concurrent_positions < 1 {
            return Err(ConfigError::InvalidConfiguration(
                "max_concurrent_positions must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn slippage_fraction(&self) -> Decimal {
        self.slippage_bps * dec!(0.0001)
    }
}
