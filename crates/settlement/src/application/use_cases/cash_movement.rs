use bourse_core::{AccountId, LedgerEntry, LedgerEntryType, Money, NewLedgerEntry};
use bourse_ports::SettlementBatch;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::application::TradingContext;
use crate::domain::ValidationError;
use crate::error::{EngineError, Result};

/// Deposits and withdrawals, booked through the same atomic commit as fills
pub struct CashMovementUseCase {
    ctx: TradingContext,
    /// Source of `CASH-{n}` references
    sequence: Arc<AtomicU64>,
}

impl CashMovementUseCase {
    pub fn new(ctx: TradingContext) -> Self {
        Self {
            ctx,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn deposit(
        &self,
        account_id: AccountId,
        amount: Money,
        description: &str,
    ) -> Result<LedgerEntry> {
        self.book(account_id, LedgerEntryType::Credit, amount, description)
            .await
    }

    pub async fn withdraw(
        &self,
        account_id: AccountId,
        amount: Money,
        description: &str,
    ) -> Result<LedgerEntry> {
        self.book(account_id, LedgerEntryType::Debit, amount, description)
            .await
    }

    async fn book(
        &self,
        account_id: AccountId,
        entry_type: LedgerEntryType,
        amount: Money,
        description: &str,
    ) -> Result<LedgerEntry> {
        let amount = self.ctx.config.rounding().apply(amount);
        if amount <= Decimal::ZERO {
            return Err(ValidationError::new(
                "amount",
                format!("amount must be positive, got {amount}"),
            )
            .into());
        }

        let _guard = self.ctx.locks.lock(account_id).await;
        let mut account = self
            .ctx
            .store
            .get_account(account_id)
            .await
            .ok_or_else(|| EngineError::not_found("trading account", account_id))?;

        let now = self.ctx.clock.now();
        match entry_type {
            LedgerEntryType::Credit => account.credit(amount, now)?,
            LedgerEntryType::Debit => account.debit(amount, now)?,
        };

        let reference = format!("CASH-{}", self.sequence.fetch_add(1, Ordering::SeqCst) + 1);
        let entry = NewLedgerEntry {
            account_id,
            entry_type,
            amount,
            fee: Decimal::ZERO,
            currency: account.currency.clone(),
            description: description.to_string(),
            reference,
            balance_after: account.balance,
            created_at: now,
        };

        let committed = self
            .ctx
            .store
            .commit(SettlementBatch::cash(account, entry))
            .await?;

        tracing::info!(
            %account_id,
            entry_type = ?committed.ledger_entry.entry_type,
            %amount,
            balance = %committed.account.balance,
            reference = %committed.ledger_entry.reference,
            "cash movement booked"
        );
        Ok(committed.ledger_entry)
    }
}
