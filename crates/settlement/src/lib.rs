//! Bourse Settlement
//!
//! The order-to-settlement pipeline of a simulated securities exchange.
//!
//! # Architecture
//!
//! - **Domain**: pure rules (order validation, margin calculation, fill-ability)
//! - **Application**: use cases (SubmitOrder, PlaceTradingOrder, settlement,
//!   cash movements, read side) working against the ports in `bourse-ports`
//! - **Infrastructure**: in-memory store, reference data, price oracle,
//!   broadcast notifications, audit sinks, clocks and JSON configuration
//!
//! # Flow
//!
//! A submitted order is validated, checked for margin and persisted ACCEPTED,
//! then settled synchronously against the reference price. On a fill the
//! execution, position, ledger entry, balance and FILLED order are committed
//! atomically. Every unit of work holds its account's lock.
//!
//! # Example
//!
//! ```ignore
//! use bourse_settlement::{Bourse, BourseConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let bourse = Bourse::from_config(BourseConfig::demo()).await.unwrap();
//!     let account = bourse.queries().account(1.into()).await.unwrap();
//!     println!("{}", account.balance);
//! }
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::{
    AccountLocks, AccountQueries, CashMovementUseCase, EvaluateMarginUseCase,
    LedgerReconciliation, MarginQuery, PlaceTradingOrderCommand, PlaceTradingOrderUseCase,
    SettlementEngine, SubmitOrderCommand, SubmitOrderResult, SubmitOrderUseCase, TradingContext,
};
pub use config::SettlementConfig;
pub use domain::{FillDecision, FillPolicy, MarginCalculator, OrderValidator, ValidationError};
pub use error::{EngineError, Result};
pub use infrastructure::{
    AccountConfig, BourseConfig, BroadcastNotificationPublisher, ConfigError, FixedClock,
    InMemoryAuditLog, InMemoryInstrumentRepository, InMemoryMarginRuleRepository,
    InMemoryTradingStore, InstrumentConfig, PriceConfig, ServerConfig, StaticPriceOracle,
    SystemClock, TracingAuditSink,
};

use bourse_core::{
    AccountId, Instrument, InstrumentId, LedgerEntry, MarginDecision, Money, Order, Price,
    TradingAccount,
};
use bourse_ports::{
    AccountRegistration, AccountRepository, AuditSink, Clock, InstrumentRepository,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

/// Description of the ledger entry that funds a seeded account
pub const OPENING_BALANCE: &str = "opening balance";

/// The backend wired with in-memory infrastructure
pub struct Bourse {
    config: BourseConfig,
    context: TradingContext,
    store: Arc<InMemoryTradingStore>,
    instruments: Arc<InMemoryInstrumentRepository>,
    oracle: Arc<StaticPriceOracle>,
    publisher: Arc<BroadcastNotificationPublisher>,
    submit_order: SubmitOrderUseCase,
    place_trading_order: PlaceTradingOrderUseCase,
    evaluate_margin: EvaluateMarginUseCase,
    cash: CashMovementUseCase,
    queries: AccountQueries,
}

impl Bourse {
    /// Wire with the system clock and the `tracing` audit sink
    pub fn new(config: BourseConfig) -> Self {
        Self::with_parts(config, Arc::new(SystemClock), Arc::new(TracingAuditSink))
    }

    /// Wire with an explicit clock and audit sink
    ///
    /// Reference data (instruments, margin rules, prices) is loaded here;
    /// accounts need [`Bourse::seed_accounts`].
    pub fn with_parts(config: BourseConfig, clock: Arc<dyn Clock>, audit: Arc<dyn AuditSink>) -> Self {
        let store = Arc::new(InMemoryTradingStore::new());
        let instruments = Arc::new(InMemoryInstrumentRepository::with_instruments(
            config.instruments.iter().map(InstrumentConfig::to_instrument),
        ));
        let margin_rules = Arc::new(InMemoryMarginRuleRepository::with_rules(
            config.margin_rules.iter().cloned(),
        ));
        let oracle = Arc::new(StaticPriceOracle::new());
        let publisher = Arc::new(BroadcastNotificationPublisher::new(
            config.server.event_capacity,
        ));

        let ids: HashMap<&str, InstrumentId> = config
            .instruments
            .iter()
            .map(|i| (i.symbol.as_str(), InstrumentId::new(i.id)))
            .collect();
        for seed in &config.prices {
            if let Some(id) = ids.get(seed.symbol.as_str()) {
                oracle.set_price(*id, seed.price);
            }
        }

        let context = TradingContext {
            clock,
            store: store.clone(),
            instruments: instruments.clone(),
            margin_rules,
            oracle: oracle.clone(),
            notifier: publisher.clone(),
            audit,
            locks: Arc::new(AccountLocks::new()),
            config: config.settlement.clone(),
        };

        tracing::info!(
            name = %config.name,
            instruments = config.instruments.len(),
            margin_rules = config.margin_rules.len(),
            prices = config.prices.len(),
            "reference data loaded"
        );

        Self {
            submit_order: SubmitOrderUseCase::new(context.clone()),
            place_trading_order: PlaceTradingOrderUseCase::new(context.clone()),
            evaluate_margin: EvaluateMarginUseCase::new(context.clone()),
            cash: CashMovementUseCase::new(context.clone()),
            queries: AccountQueries::new(context.clone()),
            config,
            context,
            store,
            instruments,
            oracle,
            publisher,
        }
    }

    /// Wire and open every configured account
    pub async fn from_config(config: BourseConfig) -> Result<Self> {
        let bourse = Self::new(config);
        bourse.seed_accounts().await?;
        Ok(bourse)
    }

    pub async fn seed_accounts(&self) -> Result<Vec<TradingAccount>> {
        let mut opened = Vec::with_capacity(self.config.accounts.len());
        for seed in &self.config.accounts {
            let registration = AccountRegistration {
                trader_login: seed.trader_login.clone(),
                broker_code: seed.broker_code.clone(),
                currency: seed.currency.clone(),
                account_type: seed.account_type,
            };
            opened.push(self.open_account(registration, seed.opening_balance).await?);
        }
        Ok(opened)
    }

    /// Open an account, booking a non-zero opening balance as a deposit
    pub async fn open_account(
        &self,
        registration: AccountRegistration,
        opening_balance: Money,
    ) -> Result<TradingAccount> {
        let account = self.store.create_account(registration).await;
        tracing::info!(
            account_id = %account.id,
            trader = %account.trader_login,
            %opening_balance,
            "trading account opened"
        );
        if opening_balance > Decimal::ZERO {
            self.cash
                .deposit(account.id, opening_balance, OPENING_BALANCE)
                .await?;
        }
        self.queries.account(account.id).await
    }

    pub async fn submit_order(&self, command: SubmitOrderCommand) -> Result<SubmitOrderResult> {
        self.submit_order.execute(command).await
    }

    pub async fn place_trading_order(&self, command: PlaceTradingOrderCommand) -> Result<Order> {
        self.place_trading_order.execute(command).await
    }

    pub async fn evaluate_margin(&self, query: MarginQuery) -> Result<MarginDecision> {
        self.evaluate_margin.execute(query).await
    }

    pub async fn deposit(
        &self,
        account_id: AccountId,
        amount: Money,
        description: &str,
    ) -> Result<LedgerEntry> {
        self.cash.deposit(account_id, amount, description).await
    }

    pub async fn withdraw(
        &self,
        account_id: AccountId,
        amount: Money,
        description: &str,
    ) -> Result<LedgerEntry> {
        self.cash.withdraw(account_id, amount, description).await
    }

    /// Set the reference price of a known instrument
    pub async fn set_price(&self, instrument_id: InstrumentId, price: Price) -> Result<Instrument> {
        if price <= Decimal::ZERO {
            return Err(ValidationError::new(
                "price",
                format!("price must be positive, got {price}"),
            )
            .into());
        }
        let instrument = self
            .instruments
            .get(instrument_id)
            .await
            .ok_or_else(|| EngineError::not_found("instrument", instrument_id))?;
        self.oracle.set_price(instrument_id, price);
        Ok(instrument)
    }

    pub fn clear_price(&self, instrument_id: InstrumentId) {
        self.oracle.clear_price(instrument_id);
    }

    pub fn queries(&self) -> &AccountQueries {
        &self.queries
    }

    pub fn config(&self) -> &BourseConfig {
        &self.config
    }

    pub fn context(&self) -> &TradingContext {
        &self.context
    }

    pub fn publisher(&self) -> &Arc<BroadcastNotificationPublisher> {
        &self.publisher
    }

    pub fn instruments(&self) -> &Arc<InMemoryInstrumentRepository> {
        &self.instruments
    }
}
