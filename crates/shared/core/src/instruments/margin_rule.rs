use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Percentage margin rule for one scope (exchange + asset class)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginRule {
    /// Scope key, e.g. `NSE_CASH`, `NSE_FNO`, `MCX_COMMODITY`
    pub scope: String,
    /// Initial margin as a fraction of notional (0.20 = 20%)
    pub initial_pct: Decimal,
    /// Maintenance margin as a fraction of notional
    pub maintenance_pct: Decimal,
}

impl MarginRule {
    pub fn new(scope: impl Into<String>, initial_pct: Decimal, maintenance_pct: Decimal) -> Self {
        Self {
            scope: scope.into(),
            initial_pct,
            maintenance_pct,
        }
    }
}
