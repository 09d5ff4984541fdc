use bourse_core::{AccountId, Money};
use thiserror::Error;

/// Persistence-level failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("account {account_id} was modified concurrently: expected version {expected}, found {actual}")]
    Conflict {
        account_id: AccountId,
        expected: u64,
        actual: u64,
    },

    #[error(
        "ledger entry for account {account_id} does not continue the chain: previous balance {previous}, balance after {balance_after}"
    )]
    LedgerDiscontinuity {
        account_id: AccountId,
        previous: Money,
        balance_after: Money,
    },

    #[error("invariant violated: {0}")]
    Invariant(String),
}

/// Delivery failure of a notification; never affects settlement
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    #[error("notification channel closed")]
    Closed,

    #[error("notification delivery failed: {0}")]
    Delivery(String),
}
