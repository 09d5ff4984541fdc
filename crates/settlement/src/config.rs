use bourse_core::{Money, Rounding, RoundingMode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fee and rounding settings passed to the settlement pipeline at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Flat fee charged on every execution
    #[serde(default = "default_flat_fee")]
    pub flat_fee: Money,

    /// Decimal places of every persisted amount
    #[serde(default = "default_decimal_scale")]
    pub decimal_scale: u32,

    #[serde(default)]
    pub rounding_mode: RoundingMode,

    /// Add each SELL's realized P&L into `Position::realized_pnl`
    #[serde(default = "default_accumulate_realized_pnl")]
    pub accumulate_realized_pnl: bool,
}

fn default_flat_fee() -> Money {
    Decimal::new(2500, 2)
}

fn default_decimal_scale() -> u32 {
    2
}

fn default_accumulate_realized_pnl() -> bool {
    true
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            flat_fee: default_flat_fee(),
            decimal_scale: default_decimal_scale(),
            rounding_mode: RoundingMode::default(),
            accumulate_realized_pnl: default_accumulate_realized_pnl(),
        }
    }
}

impl SettlementConfig {
    pub fn with_flat_fee(mut self, flat_fee: Money) -> Self {
        self.flat_fee = flat_fee;
        self
    }

    pub fn with_accumulate_realized_pnl(mut self, accumulate: bool) -> Self {
        self.accumulate_realized_pnl = accumulate;
        self
    }

    pub fn rounding(&self) -> Rounding {
        Rounding::new(self.decimal_scale, self.rounding_mode)
    }

    /// The flat fee at the persisted scale
    pub fn fee(&self) -> Money {
        self.rounding().apply(self.flat_fee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = SettlementConfig::default();
        assert_eq!(config.fee(), dec!(25.00));
        assert_eq!(config.rounding(), Rounding::default());
        assert!(config.accumulate_realized_pnl);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SettlementConfig =
            serde_json::from_str(r#"{ "flat_fee": "10.5", "rounding_mode": "HALF_EVEN" }"#).unwrap();
        assert_eq!(config.fee(), dec!(10.50));
        assert_eq!(config.rounding_mode, RoundingMode::HalfEven);
        assert_eq!(config.decimal_scale, 2);
    }
}
