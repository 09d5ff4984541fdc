//! Append-only cash ledger.
//!
//! For one account, entries in creation order form a chain:
//! `balance_after[n] = balance_after[n-1] ± amount[n]`, starting from zero.
//! The account balance always equals the last `balance_after`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::values::{AccountId, LedgerEntryId, Money, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerEntryType {
    Debit,
    Credit,
}

/// Ledger entry before the store assigns an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLedgerEntry {
    pub account_id: AccountId,
    pub entry_type: LedgerEntryType,
    /// Absolute cash movement, fee included
    pub amount: Money,
    pub fee: Money,
    pub currency: String,
    pub description: String,
    pub reference: String,
    pub balance_after: Money,
    pub created_at: Timestamp,
}

impl NewLedgerEntry {
    pub fn signed_amount(&self) -> Money {
        signed(self.entry_type, self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: LedgerEntryId,
    pub account_id: AccountId,
    pub entry_type: LedgerEntryType,
    pub amount: Money,
    pub fee: Money,
    pub currency: String,
    pub description: String,
    pub reference: String,
    pub balance_after: Money,
    pub created_at: Timestamp,
}

impl LedgerEntry {
    pub fn from_new(id: LedgerEntryId, new: NewLedgerEntry) -> Self {
        Self {
            id,
            account_id: new.account_id,
            entry_type: new.entry_type,
            amount: new.amount,
            fee: new.fee,
            currency: new.currency,
            description: new.description,
            reference: new.reference,
            balance_after: new.balance_after,
            created_at: new.created_at,
        }
    }

    pub fn signed_amount(&self) -> Money {
        signed(self.entry_type, self.amount)
    }
}

fn signed(entry_type: LedgerEntryType, amount: Money) -> Money {
    match entry_type {
        LedgerEntryType::Credit => amount,
        LedgerEntryType::Debit => -amount,
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ReconciliationError {
    #[error(
        "ledger chain broken at entry {entry_id}: expected balance {expected}, recorded {recorded}"
    )]
    BrokenChain {
        entry_id: LedgerEntryId,
        expected: Money,
        recorded: Money,
    },

    #[error("account balance {balance} does not match ledger balance {ledger_balance}")]
    BalanceMismatch {
        balance: Money,
        ledger_balance: Money,
    },
}

/// Check that the next entry continues the chain from `previous_balance`
pub fn continues_chain(previous_balance: Money, entry: &NewLedgerEntry) -> bool {
    previous_balance + entry.signed_amount() == entry.balance_after
}

/// Verify an account's ledger (in creation order) against its balance
pub fn reconcile(entries: &[LedgerEntry], balance: Money) -> Result<(), ReconciliationError> {
    let mut running = Decimal::ZERO;
    for entry in entries {
        let expected = running + entry.signed_amount();
        if expected != entry.balance_after {
            return Err(ReconciliationError::BrokenChain {
                entry_id: entry.id,
                expected,
                recorded: entry.balance_after,
            });
        }
        running = entry.balance_after;
    }

    if running != balance {
        return Err(ReconciliationError::BalanceMismatch {
            balance,
            ledger_balance: running,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn entry(id: i64, entry_type: LedgerEntryType, amount: Money, after: Money) -> LedgerEntry {
        LedgerEntry {
            id: LedgerEntryId::new(id),
            account_id: AccountId::new(1),
            entry_type,
            amount,
            fee: Decimal::ZERO,
            currency: "INR".to_string(),
            description: String::new(),
            reference: String::new(),
            balance_after: after,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_reconcile_ok() {
        let entries = vec![
            entry(1, LedgerEntryType::Credit, dec!(100000.00), dec!(100000.00)),
            entry(2, LedgerEntryType::Debit, dec!(50025.00), dec!(49975.00)),
        ];
        assert!(reconcile(&entries, dec!(49975.00)).is_ok());
        assert!(reconcile(&[], Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_reconcile_broken_chain() {
        let entries = vec![
            entry(1, LedgerEntryType::Credit, dec!(100.00), dec!(100.00)),
            entry(2, LedgerEntryType::Debit, dec!(10.00), dec!(95.00)),
        ];
        let err = reconcile(&entries, dec!(95.00)).unwrap_err();
        assert_eq!(
            err,
            ReconciliationError::BrokenChain {
                entry_id: LedgerEntryId::new(2),
                expected: dec!(90.00),
                recorded: dec!(95.00),
            }
        );
    }

    #[test]
    fn test_reconcile_balance_mismatch() {
        let entries = vec![entry(1, LedgerEntryType::Credit, dec!(100.00), dec!(100.00))];
        assert!(matches!(
            reconcile(&entries, dec!(99.00)),
            Err(ReconciliationError::BalanceMismatch { .. })
        ));
    }
}
