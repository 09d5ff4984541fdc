use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::values::{InstrumentId, Price, Quantity, Symbol, round_half_up};

/// Asset class of an instrument, used to derive the margin rule scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetClass {
    Equity,
    Commodity,
    Currency,
    Derivative,
    FixedIncome,
}

impl AssetClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::Equity => "EQUITY",
            AssetClass::Commodity => "COMMODITY",
            AssetClass::Currency => "CURRENCY",
            AssetClass::Derivative => "DERIVATIVE",
            AssetClass::FixedIncome => "FIXED_INCOME",
        }
    }

    /// Suffix appended to the exchange code to form a margin scope key
    pub fn margin_suffix(&self) -> String {
        match self {
            AssetClass::Equity => "_CASH".to_string(),
            AssetClass::Commodity => "_COMMODITY".to_string(),
            other => format!("_{}", other.as_str()),
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentStatus {
    #[default]
    Active,
    Suspended,
    Delisted,
}

impl fmt::Display for InstrumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstrumentStatus::Active => f.write_str("ACTIVE"),
            InstrumentStatus::Suspended => f.write_str("SUSPENDED"),
            InstrumentStatus::Delisted => f.write_str("DELISTED"),
        }
    }
}

/// Tradable security as seen by the trading core (read-only reference data)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: InstrumentId,
    pub symbol: Symbol,
    pub asset_class: AssetClass,
    pub exchange_code: String,
    /// Minimum price increment; zero or less disables the check
    pub tick_size: Price,
    /// Only valid quantity multiple; zero or less disables the check
    pub lot_size: Quantity,
    #[serde(default)]
    pub status: InstrumentStatus,
}

impl Instrument {
    pub fn new(
        id: InstrumentId,
        symbol: impl Into<Symbol>,
        asset_class: AssetClass,
        exchange_code: impl Into<String>,
    ) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            asset_class,
            exchange_code: exchange_code.into(),
            tick_size: Decimal::new(1, 2), // 0.01
            lot_size: Decimal::ONE,
            status: InstrumentStatus::Active,
        }
    }

    pub fn with_tick_size(mut self, tick_size: Price) -> Self {
        self.tick_size = tick_size;
        self
    }

    pub fn with_lot_size(mut self, lot_size: Quantity) -> Self {
        self.lot_size = lot_size;
        self
    }

    pub fn with_status(mut self, status: InstrumentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_tradable(&self) -> bool {
        self.status == InstrumentStatus::Active
    }

    /// Margin rule scope key, e.g. `NSE_CASH`
    pub fn margin_scope(&self) -> String {
        format!("{}{}", self.exchange_code, self.asset_class.margin_suffix())
    }

    /// Secondary scope tried when an equity has no primary rule
    pub fn fallback_margin_scope(&self) -> Option<String> {
        match self.asset_class {
            AssetClass::Equity => Some(format!("{}_FNO", self.exchange_code)),
            _ => None,
        }
    }

    pub fn quantity_aligned(&self, quantity: Quantity) -> bool {
        if self.lot_size <= Decimal::ZERO {
            return true;
        }
        (quantity % self.lot_size).is_zero()
    }

    /// Price rounded half-up to the tick's scale (at least 2 dp)
    pub fn normalized_price(&self, price: Price) -> Price {
        round_half_up(price, self.tick_size.scale().max(2))
    }

    pub fn price_aligned(&self, price: Price) -> bool {
        if self.tick_size <= Decimal::ZERO {
            return true;
        }
        (self.normalized_price(price) % self.tick_size).is_zero()
    }
}
