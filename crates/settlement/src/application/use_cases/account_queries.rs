use bourse_core::{
    AccountId, Execution, LedgerEntry, Money, Order, OrderId, Position, ReconciliationError,
    TradingAccount, reconcile,
};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::application::TradingContext;
use crate::error::{EngineError, Result};

/// Outcome of checking an account's ledger against its balance
#[derive(Debug, Clone, Serialize)]
pub struct LedgerReconciliation {
    pub account_id: AccountId,
    pub balance: Money,
    /// Last `balance_after` of the ledger, zero when empty
    pub ledger_balance: Money,
    pub entry_count: usize,
    pub consistent: bool,
    pub error: Option<ReconciliationError>,
}

/// Read side: per-account snapshots and ledger reconciliation
pub struct AccountQueries {
    ctx: TradingContext,
}

impl AccountQueries {
    pub fn new(ctx: TradingContext) -> Self {
        Self { ctx }
    }

    pub async fn account(&self, account_id: AccountId) -> Result<TradingAccount> {
        self.ctx
            .store
            .get_account(account_id)
            .await
            .ok_or_else(|| EngineError::not_found("trading account", account_id))
    }

    pub async fn positions(&self, account_id: AccountId) -> Result<Vec<Position>> {
        self.account(account_id).await?;
        Ok(self.ctx.store.list_positions(account_id).await)
    }

    pub async fn ledger(&self, account_id: AccountId) -> Result<Vec<LedgerEntry>> {
        self.account(account_id).await?;
        Ok(self.ctx.store.list_ledger_entries(account_id).await)
    }

    pub async fn orders(&self, account_id: AccountId) -> Result<Vec<Order>> {
        self.account(account_id).await?;
        Ok(self.ctx.store.list_orders(account_id).await)
    }

    pub async fn executions(&self, account_id: AccountId) -> Result<Vec<Execution>> {
        self.account(account_id).await?;
        Ok(self.ctx.store.list_executions(account_id).await)
    }

    pub async fn order(&self, order_id: OrderId) -> Result<Order> {
        self.ctx
            .store
            .get_order(order_id)
            .await
            .ok_or_else(|| EngineError::not_found("order", order_id))
    }

    pub async fn execution_for_order(&self, order_id: OrderId) -> Result<Option<Execution>> {
        self.order(order_id).await?;
        Ok(self.ctx.store.find_execution_by_order(order_id).await)
    }

    /// Verify the ledger chain and that it ends at the account balance
    ///
    /// Taken under the account lock so no settlement is half-visible.
    pub async fn reconcile_ledger(&self, account_id: AccountId) -> Result<LedgerReconciliation> {
        let _guard = self.ctx.locks.lock(account_id).await;
        let account = self.account(account_id).await?;
        let entries = self.ctx.store.list_ledger_entries(account_id).await;

        let ledger_balance = entries
            .last()
            .map(|e| e.balance_after)
            .unwrap_or(Decimal::ZERO);
        let error = reconcile(&entries, account.balance).err();
        if let Some(error) = &error {
            tracing::error!(%account_id, %error, "ledger reconciliation failed");
        }

        Ok(LedgerReconciliation {
            account_id,
            balance: account.balance,
            ledger_balance,
            entry_count: entries.len(),
            consistent: error.is_none(),
            error,
        })
    }
}
