//! Transactional persistence ports.
//!
//! Reads go through the per-entity repositories. Every write that touches an
//! account balance goes through [`SettlementStore::commit`], which applies the
//! whole batch or nothing.

use async_trait::async_trait;
use bourse_core::{
    AccountId, AccountType, Execution, InstrumentId, LedgerEntry, NewExecution, NewLedgerEntry,
    NewOrder, Order, OrderId, Position, TradingAccount,
};

use crate::error::StoreError;

/// Data needed to open a trading account
#[derive(Debug, Clone)]
pub struct AccountRegistration {
    pub trader_login: String,
    pub broker_code: String,
    pub currency: String,
    pub account_type: AccountType,
}

#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn get_account(&self, id: AccountId) -> Option<TradingAccount>;

    /// All accounts owned by a trader login
    async fn find_accounts_by_trader(&self, trader_login: &str) -> Vec<TradingAccount>;

    /// Open an account with zero balance
    async fn create_account(&self, registration: AccountRegistration) -> TradingAccount;

    async fn list_accounts(&self) -> Vec<TradingAccount>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order and assign its id
    async fn insert_order(&self, order: NewOrder) -> Order;

    async fn get_order(&self, id: OrderId) -> Option<Order>;

    /// Overwrite an existing order (status transitions without cash effect)
    async fn update_order(&self, order: &Order) -> Result<(), StoreError>;

    /// Orders of an account, oldest first
    async fn list_orders(&self, account_id: AccountId) -> Vec<Order>;
}

#[async_trait]
pub trait PositionRepository: Send + Sync {
    async fn find_position(
        &self,
        account_id: AccountId,
        instrument_id: InstrumentId,
    ) -> Option<Position>;

    async fn list_positions(&self, account_id: AccountId) -> Vec<Position>;
}

#[async_trait]
pub trait ExecutionRepository: Send + Sync {
    async fn find_execution_by_order(&self, order_id: OrderId) -> Option<Execution>;

    /// Executions of an account, oldest first
    async fn list_executions(&self, account_id: AccountId) -> Vec<Execution>;
}

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Ledger entries of an account in creation order
    async fn list_ledger_entries(&self, account_id: AccountId) -> Vec<LedgerEntry>;
}

/// One atomic unit of cash-affecting writes for a single account
#[derive(Debug, Clone)]
pub struct SettlementBatch {
    /// New account state; `version` must equal the stored version
    pub account: TradingAccount,
    pub ledger_entry: NewLedgerEntry,
    pub order: Option<Order>,
    pub execution: Option<NewExecution>,
    pub position: Option<Position>,
}

impl SettlementBatch {
    /// Cash movement without an order (deposit/withdrawal)
    pub fn cash(account: TradingAccount, ledger_entry: NewLedgerEntry) -> Self {
        Self {
            account,
            ledger_entry,
            order: None,
            execution: None,
            position: None,
        }
    }
}

/// What the store persisted for a batch
#[derive(Debug, Clone)]
pub struct CommittedSettlement {
    pub account: TradingAccount,
    pub ledger_entry: LedgerEntry,
    pub order: Option<Order>,
    pub execution: Option<Execution>,
    pub position: Option<Position>,
}

#[async_trait]
pub trait SettlementStore: Send + Sync {
    /// Apply every write in the batch atomically.
    ///
    /// Fails without applying anything when the account version moved, the
    /// ledger entry does not continue the account's chain, or the order does
    /// not exist.
    async fn commit(&self, batch: SettlementBatch) -> Result<CommittedSettlement, StoreError>;
}

/// Everything the trading core needs from persistence
pub trait TradingStore:
    AccountRepository
    + OrderRepository
    + PositionRepository
    + ExecutionRepository
    + LedgerRepository
    + SettlementStore
{
}

impl<T> TradingStore for T where
    T: AccountRepository
        + OrderRepository
        + PositionRepository
        + ExecutionRepository
        + LedgerRepository
        + SettlementStore
{
}
