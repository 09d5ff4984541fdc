use bourse_core::{AccountError, MarginAssessment, Money, OrderTransitionError};
use bourse_ports::StoreError;
use thiserror::Error;

use crate::domain::ValidationError;

/// Errors raised by the order-to-settlement pipeline
///
/// Business outcomes decided during settlement (no price, limit not met,
/// insufficient funds at fill) are not errors: they end in a REJECTED order.
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error(
        "insufficient margin: initial requirement {}, available balance {}",
        .0.initial_requirement,
        .0.available_balance
    )]
    InsufficientMargin(Box<MarginAssessment>),

    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Money, available: Money },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transition(#[from] OrderTransitionError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl EngineError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        EngineError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Stable error code exposed to callers
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "VALIDATION",
            EngineError::NotFound { .. } => "NOT_FOUND",
            EngineError::InsufficientMargin(_) => "INSUFFICIENT_MARGIN",
            EngineError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            EngineError::Store(_) => "STORE",
            EngineError::Transition(_) | EngineError::Internal(_) => "INTERNAL",
        }
    }

    /// Margin assessment carried by an `INSUFFICIENT_MARGIN` error
    pub fn assessment(&self) -> Option<&MarginAssessment> {
        match self {
            EngineError::InsufficientMargin(assessment) => Some(&**assessment),
            _ => None,
        }
    }
}

impl From<AccountError> for EngineError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InsufficientBalance {
                required,
                available,
            } => EngineError::InsufficientFunds {
                required,
                available,
            },
            AccountError::NonPositiveAmount(_) => {
                EngineError::Validation(ValidationError::new("amount", err.to_string()))
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use bourse_core::AccountId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_kinds() {
        let err = EngineError::not_found("instrument", "ACME");
        assert_eq!(err.kind(), "NOT_FOUND");
        assert_eq!(err.to_string(), "instrument not found: ACME");

        let err: EngineError = ValidationError::new("lot_size", "quantity 15 is not a multiple of lot size 10").into();
        assert_eq!(err.kind(), "VALIDATION");
        assert_eq!(err.to_string(), "quantity 15 is not a multiple of lot size 10");

        let err: EngineError = StoreError::Conflict {
            account_id: AccountId::new(1),
            expected: 3,
            actual: 4,
        }
        .into();
        assert_eq!(err.kind(), "STORE");

        let err = EngineError::InsufficientFunds {
            required: dec!(10.00),
            available: dec!(5.00),
        };
        assert_eq!(err.kind(), "INSUFFICIENT_FUNDS");
        assert!(err.assessment().is_none());
    }
}
