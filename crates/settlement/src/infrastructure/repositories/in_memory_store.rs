use async_trait::async_trait;
use bourse_core::{
    AccountId, Execution, ExecutionId, InstrumentId, LedgerEntry, LedgerEntryId, NewOrder, Order,
    OrderId, Position, TradingAccount, continues_chain,
};
use bourse_ports::{
    AccountRegistration, AccountRepository, CommittedSettlement, ExecutionRepository,
    LedgerRepository, OrderRepository, PositionRepository, SettlementBatch, SettlementStore,
    StoreError,
};
use chrono::Utc;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// In-memory transactional store
///
/// All tables sit behind one lock so a settlement batch is applied as a
/// whole: every check runs before the first write.
pub struct InMemoryTradingStore {
    tables: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<AccountId, TradingAccount>,
    orders: BTreeMap<OrderId, Order>,
    executions: BTreeMap<ExecutionId, Execution>,
    positions: HashMap<(AccountId, InstrumentId), Position>,
    /// Ledger per account, in creation order
    ledger: HashMap<AccountId, Vec<LedgerEntry>>,
    sequences: Sequences,
}

#[derive(Default)]
struct Sequences {
    account: i64,
    order: i64,
    execution: i64,
    ledger_entry: i64,
}

impl Sequences {
    fn next(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

impl Tables {
    fn last_balance(&self, account_id: AccountId) -> Decimal {
        self.ledger
            .get(&account_id)
            .and_then(|entries| entries.last())
            .map(|entry| entry.balance_after)
            .unwrap_or(Decimal::ZERO)
    }

    /// Every check a batch must pass before anything is written
    fn verify(&self, batch: &SettlementBatch) -> Result<(), StoreError> {
        let account_id = batch.account.id;
        let stored = self
            .accounts
            .get(&account_id)
            .ok_or_else(|| StoreError::NotFound {
                entity: "account",
                id: account_id.to_string(),
            })?;

        if stored.version != batch.account.version {
            return Err(StoreError::Conflict {
                account_id,
                expected: batch.account.version,
                actual: stored.version,
            });
        }

        let entry = &batch.ledger_entry;
        if entry.account_id != account_id {
            return Err(StoreError::Invariant(format!(
                "ledger entry for account {} committed with account {}",
                entry.account_id, account_id
            )));
        }

        let previous = self.last_balance(account_id);
        if !continues_chain(previous, entry) || entry.balance_after != batch.account.balance {
            return Err(StoreError::LedgerDiscontinuity {
                account_id,
                previous,
                balance_after: entry.balance_after,
            });
        }

        if let Some(order) = &batch.order {
            if !self.orders.contains_key(&order.id) {
                return Err(StoreError::NotFound {
                    entity: "order",
                    id: order.id.to_string(),
                });
            }
        }

        for (owner, what) in [
            (batch.execution.as_ref().map(|e| e.account_id), "execution"),
            (batch.position.as_ref().map(|p| p.account_id), "position"),
        ] {
            if owner.is_some_and(|owner| owner != account_id) {
                return Err(StoreError::Invariant(format!(
                    "{what} does not belong to account {account_id}"
                )));
            }
        }

        Ok(())
    }
}

impl InMemoryTradingStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
        }
    }
}

impl Default for InMemoryTradingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryTradingStore {
    fn clone(&self) -> Self {
        Self {
            tables: Arc::clone(&self.tables),
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryTradingStore {
    async fn get_account(&self, id: AccountId) -> Option<TradingAccount> {
        self.tables.read().accounts.get(&id).cloned()
    }

    async fn find_accounts_by_trader(&self, trader_login: &str) -> Vec<TradingAccount> {
        self.tables
            .read()
            .accounts
            .values()
            .filter(|a| a.trader_login == trader_login)
            .cloned()
            .collect()
    }

    async fn create_account(&self, registration: AccountRegistration) -> TradingAccount {
        let mut tables = self.tables.write();
        let id = AccountId::new(Sequences::next(&mut tables.sequences.account));
        let account = TradingAccount::new(
            id,
            registration.trader_login,
            registration.broker_code,
            registration.currency,
            Utc::now(),
        )
        .with_account_type(registration.account_type);
        tables.accounts.insert(id, account.clone());
        account
    }

    async fn list_accounts(&self) -> Vec<TradingAccount> {
        self.tables.read().accounts.values().cloned().collect()
    }
}

#[async_trait]
impl OrderRepository for InMemoryTradingStore {
    async fn insert_order(&self, order: NewOrder) -> Order {
        let mut tables = self.tables.write();
        let id = OrderId::new(Sequences::next(&mut tables.sequences.order));
        let order = Order::from_new(id, order);
        tables.orders.insert(id, order.clone());
        order
    }

    async fn get_order(&self, id: OrderId) -> Option<Order> {
        self.tables.read().orders.get(&id).cloned()
    }

    async fn update_order(&self, order: &Order) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        match tables.orders.get_mut(&order.id) {
            Some(stored) => {
                *stored = order.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "order",
                id: order.id.to_string(),
            }),
        }
    }

    async fn list_orders(&self, account_id: AccountId) -> Vec<Order> {
        self.tables
            .read()
            .orders
            .values()
            .filter(|o| o.account_id == account_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PositionRepository for InMemoryTradingStore {
    async fn find_position(
        &self,
        account_id: AccountId,
        instrument_id: InstrumentId,
    ) -> Option<Position> {
        self.tables
            .read()
            .positions
            .get(&(account_id, instrument_id))
            .cloned()
    }

    async fn list_positions(&self, account_id: AccountId) -> Vec<Position> {
        let mut positions: Vec<Position> = self
            .tables
            .read()
            .positions
            .values()
            .filter(|p| p.account_id == account_id)
            .cloned()
            .collect();
        positions.sort_by_key(|p| p.instrument_id);
        positions
    }
}

#[async_trait]
impl ExecutionRepository for InMemoryTradingStore {
    async fn find_execution_by_order(&self, order_id: OrderId) -> Option<Execution> {
        self.tables
            .read()
            .executions
            .values()
            .find(|e| e.order_id == order_id)
            .cloned()
    }

    async fn list_executions(&self, account_id: AccountId) -> Vec<Execution> {
        self.tables
            .read()
            .executions
            .values()
            .filter(|e| e.account_id == account_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl LedgerRepository for InMemoryTradingStore {
    async fn list_ledger_entries(&self, account_id: AccountId) -> Vec<LedgerEntry> {
        self.tables
            .read()
            .ledger
            .get(&account_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl SettlementStore for InMemoryTradingStore {
    async fn commit(&self, batch: SettlementBatch) -> Result<CommittedSettlement, StoreError> {
        let mut tables = self.tables.write();
        tables.verify(&batch)?;

        let SettlementBatch {
            mut account,
            ledger_entry,
            order,
            execution,
            position,
        } = batch;

        account.version += 1;
        tables.accounts.insert(account.id, account.clone());

        let entry_id = LedgerEntryId::new(Sequences::next(&mut tables.sequences.ledger_entry));
        let ledger_entry = LedgerEntry::from_new(entry_id, ledger_entry);
        tables
            .ledger
            .entry(account.id)
            .or_default()
            .push(ledger_entry.clone());

        let execution = execution.map(|new| {
            let id = ExecutionId::new(Sequences::next(&mut tables.sequences.execution));
            let execution = Execution::from_new(id, new);
            tables.executions.insert(id, execution.clone());
            execution
        });

        if let Some(position) = &position {
            tables
                .positions
                .insert((position.account_id, position.instrument_id), position.clone());
        }

        if let Some(order) = &order {
            tables.orders.insert(order.id, order.clone());
        }

        Ok(CommittedSettlement {
            account,
            ledger_entry,
            order,
            execution,
            position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bourse_core::{AccountType, LedgerEntryType, NewLedgerEntry};
    use rust_decimal_macros::dec;

    fn registration() -> AccountRegistration {
        AccountRegistration {
            trader_login: "alice".to_string(),
            broker_code: "BRK1".to_string(),
            currency: "INR".to_string(),
            account_type: AccountType::Cash,
        }
    }

    fn credit(account: &TradingAccount, amount: Decimal, after: Decimal) -> NewLedgerEntry {
        NewLedgerEntry {
            account_id: account.id,
            entry_type: LedgerEntryType::Credit,
            amount,
            fee: Decimal::ZERO,
            currency: account.currency.clone(),
            description: "deposit".to_string(),
            reference: "CASH-1".to_string(),
            balance_after: after,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_commit_bumps_version_and_appends_ledger() {
        let store = InMemoryTradingStore::new();
        let mut account = store.create_account(registration()).await;
        assert_eq!(account.id, AccountId::new(1));

        account.balance = dec!(1000.00);
        let entry = credit(&account, dec!(1000.00), dec!(1000.00));
        let committed = store
            .commit(SettlementBatch::cash(account, entry))
            .await
            .unwrap();

        assert_eq!(committed.account.version, 1);
        assert_eq!(committed.ledger_entry.id, LedgerEntryId::new(1));

        let stored = store.get_account(AccountId::new(1)).await.unwrap();
        assert_eq!(stored.balance, dec!(1000.00));
        assert_eq!(store.list_ledger_entries(stored.id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_version_is_rejected_without_writes() {
        let store = InMemoryTradingStore::new();
        let account = store.create_account(registration()).await;

        let mut first = account.clone();
        first.balance = dec!(10.00);
        store
            .commit(SettlementBatch::cash(
                first,
                credit(&account, dec!(10.00), dec!(10.00)),
            ))
            .await
            .unwrap();

        // Same base version as the first commit
        let mut stale = account.clone();
        stale.balance = dec!(30.00);
        let err = store
            .commit(SettlementBatch::cash(
                stale,
                credit(&account, dec!(20.00), dec!(30.00)),
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Conflict { expected: 0, actual: 1, .. }));
        assert_eq!(store.list_ledger_entries(account.id).await.len(), 1);
        assert_eq!(
            store.get_account(account.id).await.unwrap().balance,
            dec!(10.00)
        );
    }

    #[tokio::test]
    async fn test_broken_chain_is_rejected() {
        let store = InMemoryTradingStore::new();
        let mut account = store.create_account(registration()).await;
        account.balance = dec!(50.00);

        let err = store
            .commit(SettlementBatch::cash(
                account.clone(),
                credit(&account, dec!(40.00), dec!(50.00)),
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::LedgerDiscontinuity { .. }));
        assert!(store.list_ledger_entries(account.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_order_fails() {
        let store = InMemoryTradingStore::new();
        let order = Order::from_new(
            OrderId::new(99),
            NewOrder {
                account_id: AccountId::new(1),
                instrument_id: InstrumentId::new(1),
                side: bourse_core::Side::Buy,
                order_type: bourse_core::OrderType::Market,
                quantity: dec!(1),
                limit_price: None,
                stop_price: None,
                time_in_force: bourse_core::TimeInForce::Day,
                status: bourse_core::OrderStatus::Accepted,
                venue: "NSE".to_string(),
                created_at: Utc::now(),
            },
        );
        assert!(matches!(
            store.update_order(&order).await,
            Err(StoreError::NotFound { entity: "order", .. })
        ));
    }
}
