//! Configuration loading for the Bourse backend
//!
//! Supports JSON configuration files for:
//! - Server settings (address, notification channel capacity)
//! - Settlement fee and rounding
//! - Seed reference data: instruments, margin rules and prices
//! - Trading accounts with opening balances

use bourse_core::{
    AccountType, AssetClass, Instrument, InstrumentId, InstrumentStatus, MarginRule, Money, Price,
    Quantity,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::config::SettlementConfig;

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BourseConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub settlement: SettlementConfig,

    /// Instruments to load as reference data
    #[serde(default)]
    pub instruments: Vec<InstrumentConfig>,

    #[serde(default)]
    pub margin_rules: Vec<MarginRule>,

    /// Trading accounts to open
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,

    /// Initial reference prices
    #[serde(default)]
    pub prices: Vec<PriceConfig>,
}

fn default_name() -> String {
    "Bourse".to_string()
}

impl Default for BourseConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            server: ServerConfig::default(),
            settlement: SettlementConfig::default(),
            instruments: Vec::new(),
            margin_rules: Vec::new(),
            accounts: Vec::new(),
            prices: Vec::new(),
        }
    }
}

impl BourseConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// A small NSE/MCX market with one funded trader
    pub fn demo() -> Self {
        Self {
            instruments: vec![
                InstrumentConfig::equity(1, "INFY", "NSE", Decimal::new(5, 2), Decimal::ONE),
                InstrumentConfig::equity(2, "TCS", "NSE", Decimal::new(5, 2), Decimal::ONE),
                InstrumentConfig {
                    id: 3,
                    symbol: "GOLD".to_string(),
                    asset_class: AssetClass::Commodity,
                    exchange_code: "MCX".to_string(),
                    tick_size: Decimal::ONE,
                    lot_size: Decimal::ONE,
                    status: InstrumentStatus::Active,
                },
            ],
            margin_rules: vec![
                MarginRule::new("NSE_CASH", Decimal::new(20, 2), Decimal::new(10, 2)),
                MarginRule::new("NSE_FNO", Decimal::new(15, 2), Decimal::new(10, 2)),
                MarginRule::new("MCX_COMMODITY", Decimal::new(10, 2), Decimal::new(5, 2)),
            ],
            accounts: vec![AccountConfig {
                trader_login: "demo".to_string(),
                broker_code: "BRK1".to_string(),
                currency: default_currency(),
                account_type: AccountType::Cash,
                opening_balance: Decimal::new(100_000_00, 2),
            }],
            prices: vec![
                PriceConfig::new("INFY", Decimal::new(1500_00, 2)),
                PriceConfig::new("TCS", Decimal::new(3800_00, 2)),
                PriceConfig::new("GOLD", Decimal::new(72000, 0)),
            ],
            ..Default::default()
        }
    }

    /// Cross-reference checks serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut ids = HashSet::new();
        let mut symbols = HashSet::new();
        for instrument in &self.instruments {
            if !ids.insert(instrument.id) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate instrument id {}",
                    instrument.id
                )));
            }
            if !symbols.insert(instrument.symbol.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate instrument symbol {}",
                    instrument.symbol
                )));
            }
        }

        for price in &self.prices {
            if !symbols.contains(price.symbol.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "price given for unknown instrument {}",
                    price.symbol
                )));
            }
            if price.price <= Decimal::ZERO {
                return Err(ConfigError::Invalid(format!(
                    "price for {} must be positive",
                    price.symbol
                )));
            }
        }

        for account in &self.accounts {
            if account.opening_balance < Decimal::ZERO {
                return Err(ConfigError::Invalid(format!(
                    "opening balance of {} must not be negative",
                    account.trader_login
                )));
            }
        }

        if self.settlement.flat_fee < Decimal::ZERO {
            return Err(ConfigError::Invalid("flat fee must not be negative".to_string()));
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Notification channel capacity
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_event_capacity() -> usize {
    10000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            event_capacity: default_event_capacity(),
        }
    }
}

/// Instrument seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentConfig {
    pub id: i64,
    pub symbol: String,
    pub asset_class: AssetClass,
    pub exchange_code: String,

    #[serde(default = "default_tick_size")]
    pub tick_size: Price,

    #[serde(default = "default_lot_size")]
    pub lot_size: Quantity,

    #[serde(default)]
    pub status: InstrumentStatus,
}

fn default_tick_size() -> Price {
    Decimal::new(1, 2)
}

fn default_lot_size() -> Quantity {
    Decimal::ONE
}

impl InstrumentConfig {
    pub fn equity(
        id: i64,
        symbol: &str,
        exchange_code: &str,
        tick_size: Price,
        lot_size: Quantity,
    ) -> Self {
        Self {
            id,
            symbol: symbol.to_string(),
            asset_class: AssetClass::Equity,
            exchange_code: exchange_code.to_string(),
            tick_size,
            lot_size,
            status: InstrumentStatus::Active,
        }
    }

    pub fn to_instrument(&self) -> Instrument {
        Instrument::new(
            InstrumentId::new(self.id),
            self.symbol.clone(),
            self.asset_class,
            self.exchange_code.clone(),
        )
        .with_tick_size(self.tick_size)
        .with_lot_size(self.lot_size)
        .with_status(self.status)
    }
}

/// Trading account seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub trader_login: String,

    #[serde(default = "default_broker_code")]
    pub broker_code: String,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default)]
    pub account_type: AccountType,

    /// Booked as a deposit so the ledger starts from zero
    #[serde(default)]
    pub opening_balance: Money,
}

fn default_broker_code() -> String {
    "DEFAULT".to_string()
}

fn default_currency() -> String {
    "INR".to_string()
}

/// Reference price seed, by symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceConfig {
    pub symbol: String,
    pub price: Price,
}

impl PriceConfig {
    pub fn new(symbol: &str, price: Price) -> Self {
        Self {
            symbol: symbol.to_string(),
            price,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_minimal_config() {
        let config = BourseConfig::from_json("{}").unwrap();
        assert_eq!(config.name, "Bourse");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.settlement.flat_fee, dec!(25.00));
        assert!(config.instruments.is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "server": { "port": 9090 },
            "settlement": { "flat_fee": "20", "accumulate_realized_pnl": false },
            "instruments": [
                { "id": 1, "symbol": "INFY", "asset_class": "EQUITY", "exchange_code": "NSE",
                  "tick_size": "0.05", "lot_size": "10" }
            ],
            "margin_rules": [
                { "scope": "NSE_CASH", "initial_pct": "0.20", "maintenance_pct": "0.10" }
            ],
            "accounts": [
                { "trader_login": "alice", "opening_balance": "100000.00" }
            ],
            "prices": [ { "symbol": "INFY", "price": "500.00" } ]
        }"#;

        let config = BourseConfig::from_json(json).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(!config.settlement.accumulate_realized_pnl);

        let infy = config.instruments[0].to_instrument();
        assert_eq!(infy.lot_size, dec!(10));
        assert_eq!(infy.margin_scope(), "NSE_CASH");

        let alice = &config.accounts[0];
        assert_eq!(alice.currency, "INR");
        assert_eq!(alice.account_type, AccountType::Cash);
        assert_eq!(alice.opening_balance, dec!(100000.00));
    }

    #[test]
    fn test_price_for_unknown_symbol_is_invalid() {
        let json = r#"{ "prices": [ { "symbol": "NOPE", "price": "1" } ] }"#;
        assert!(matches!(
            BourseConfig::from_json(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = BourseConfig::from_file("/nonexistent/bourse.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_demo_is_valid() {
        let demo = BourseConfig::demo();
        assert!(demo.validate().is_ok());
        assert_eq!(demo.accounts[0].opening_balance, dec!(100000.00));
    }
}
