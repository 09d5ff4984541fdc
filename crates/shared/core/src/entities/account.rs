//! Trading account entity: one per trader-broker relationship.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::values::{AccountId, Money, Timestamp};

/// Account type. Only cash accounts can trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    #[default]
    Cash,
    Margin,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Cash => f.write_str("CASH"),
            AccountType::Margin => f.write_str("MARGIN"),
        }
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    #[default]
    Active,
    Suspended,
    Closed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: Money, available: Money },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingAccount {
    pub id: AccountId,
    pub trader_login: String,
    pub broker_code: String,
    pub account_type: AccountType,
    /// Base currency for balance and ledger entries
    pub currency: String,
    pub balance: Money,
    pub status: AccountStatus,
    /// Bumped by the store on every committed balance change
    pub version: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TradingAccount {
    /// Create an empty cash account. The opening balance is booked as a
    /// ledger credit, never set directly.
    pub fn new(
        id: AccountId,
        trader_login: impl Into<String>,
        broker_code: impl Into<String>,
        currency: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            trader_login: trader_login.into(),
            broker_code: broker_code.into(),
            account_type: AccountType::Cash,
            currency: currency.into(),
            balance: Decimal::ZERO,
            status: AccountStatus::Active,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = account_type;
        self
    }

    pub fn with_status(mut self, status: AccountStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Remove funds. Refuses to take the balance below zero.
    pub fn debit(&mut self, amount: Money, now: Timestamp) -> Result<Money, AccountError> {
        if amount <= Decimal::ZERO {
            return Err(AccountError::NonPositiveAmount(amount));
        }
        if self.balance < amount {
            return Err(AccountError::InsufficientBalance {
                required: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        self.updated_at = now;
        Ok(self.balance)
    }

    /// Apply a signed cash movement; refuses to take the balance below zero
    pub fn apply_signed(&mut self, amount: Money, now: Timestamp) -> Result<Money, AccountError> {
        let next = self.balance + amount;
        if next < Decimal::ZERO {
            return Err(AccountError::InsufficientBalance {
                required: -amount,
                available: self.balance,
            });
        }
        self.balance = next;
        self.updated_at = now;
        Ok(self.balance)
    }

    /// Add funds
    pub fn credit(&mut self, amount: Money, now: Timestamp) -> Result<Money, AccountError> {
        if amount <= Decimal::ZERO {
            return Err(AccountError::NonPositiveAmount(amount));
        }
        self.balance += amount;
        self.updated_at = now;
        Ok(self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn account() -> TradingAccount {
        TradingAccount::new(AccountId::new(1), "alice", "BRK1", "INR", Utc::now())
    }

    #[test]
    fn test_new_account_is_empty_cash() {
        let a = account();
        assert_eq!(a.balance, Decimal::ZERO);
        assert_eq!(a.account_type, AccountType::Cash);
        assert!(a.is_active());
    }

    #[test]
    fn test_debit_never_goes_negative() {
        let mut a = account();
        a.credit(dec!(100.00), Utc::now()).unwrap();
        assert_eq!(a.debit(dec!(40.00), Utc::now()).unwrap(), dec!(60.00));

        let err = a.debit(dec!(60.01), Utc::now()).unwrap_err();
        assert_eq!(
            err,
            AccountError::InsufficientBalance {
                required: dec!(60.01),
                available: dec!(60.00)
            }
        );
        assert_eq!(a.balance, dec!(60.00));
    }

    #[test]
    fn test_apply_signed() {
        let mut a = account();
        assert_eq!(a.apply_signed(dec!(10.00), Utc::now()).unwrap(), dec!(10.00));
        assert_eq!(a.apply_signed(dec!(-4.00), Utc::now()).unwrap(), dec!(6.00));
        assert!(a.apply_signed(dec!(-6.01), Utc::now()).is_err());
        assert_eq!(a.balance, dec!(6.00));
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        let mut a = account();
        assert!(a.credit(Decimal::ZERO, Utc::now()).is_err());
        assert!(a.debit(dec!(-1), Utc::now()).is_err());
    }
}
