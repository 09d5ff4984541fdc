#![allow(dead_code)]

use bourse_core::{AccountId, InstrumentId, OrderType, Price, Quantity, Side, TimeInForce};
use bourse_settlement::{
    AccountConfig, Bourse, BourseConfig, FixedClock, InMemoryAuditLog, InstrumentConfig,
    PlaceTradingOrderCommand, PriceConfig, SubmitOrderCommand,
};
use bourse_core::{AccountType, MarginRule};
use rust_decimal_macros::dec;
use std::sync::Arc;

pub const TRADER: &str = "alice";
pub const INFY: InstrumentId = InstrumentId::new(1);

pub struct Harness {
    pub bourse: Arc<Bourse>,
    pub audit: InMemoryAuditLog,
    pub clock: FixedClock,
    pub account_id: AccountId,
}

/// NSE market with INFY (tick 0.05, lot 10) at 500.00 and one CASH account
pub fn config(opening_balance: rust_decimal::Decimal) -> BourseConfig {
    BourseConfig {
        instruments: vec![InstrumentConfig::equity(
            1,
            "INFY",
            "NSE",
            dec!(0.05),
            dec!(10),
        )],
        margin_rules: vec![MarginRule::new("NSE_CASH", dec!(0.20), dec!(0.10))],
        accounts: vec![AccountConfig {
            trader_login: TRADER.to_string(),
            broker_code: "BRK1".to_string(),
            currency: "INR".to_string(),
            account_type: AccountType::Cash,
            opening_balance,
        }],
        prices: vec![PriceConfig::new("INFY", dec!(500.00))],
        ..Default::default()
    }
}

pub async fn harness_with(config: BourseConfig) -> Harness {
    let audit = InMemoryAuditLog::new();
    let clock = FixedClock::default();
    let bourse = Bourse::with_parts(config, Arc::new(clock.clone()), Arc::new(audit.clone()));
    let accounts = bourse.seed_accounts().await.unwrap();
    Harness {
        account_id: accounts[0].id,
        bourse: Arc::new(bourse),
        audit,
        clock,
    }
}

pub async fn harness(opening_balance: rust_decimal::Decimal) -> Harness {
    harness_with(config(opening_balance)).await
}

pub fn market(side: Side, quantity: Quantity) -> SubmitOrderCommand {
    SubmitOrderCommand {
        trader_login: TRADER.to_string(),
        instrument: "INFY".to_string(),
        side,
        order_type: OrderType::Market,
        time_in_force: TimeInForce::Day,
        quantity,
        limit_price: None,
        stop_price: None,
    }
}

pub fn limit(side: Side, quantity: Quantity, price: Price) -> SubmitOrderCommand {
    SubmitOrderCommand {
        order_type: OrderType::Limit,
        limit_price: Some(price),
        ..market(side, quantity)
    }
}

pub fn trading(side: Side, order_type: OrderType, quantity: Quantity) -> PlaceTradingOrderCommand {
    PlaceTradingOrderCommand {
        trader_login: TRADER.to_string(),
        instrument_id: INFY,
        side,
        order_type,
        quantity,
        limit_price: None,
        stop_price: None,
        time_in_force: TimeInForce::Day,
    }
}
