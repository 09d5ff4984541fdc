use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::values::Money;

/// Result of a pre-trade margin check. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginAssessment {
    /// Margin rule scope that was applied (e.g. `NSE_CASH`)
    pub scope: String,
    pub notional: Money,
    pub initial_requirement: Money,
    pub maintenance_requirement: Money,
    pub available_balance: Money,
    /// Balance left after the hypothetical initial-margin debit
    pub remaining_balance: Money,
    pub sufficient: bool,
}

impl MarginAssessment {
    /// Amount missing to cover the initial requirement
    pub fn shortfall(&self) -> Money {
        if self.remaining_balance < Decimal::ZERO {
            -self.remaining_balance
        } else {
            Decimal::ZERO
        }
    }
}

/// Typed outcome of margin evaluation; callers branch on it
#[derive(Debug, Clone, PartialEq)]
pub enum MarginDecision {
    Sufficient(MarginAssessment),
    Insufficient(MarginAssessment),
}

impl MarginDecision {
    pub fn assessment(&self) -> &MarginAssessment {
        match self {
            MarginDecision::Sufficient(a) | MarginDecision::Insufficient(a) => a,
        }
    }

    pub fn into_assessment(self) -> MarginAssessment {
        match self {
            MarginDecision::Sufficient(a) | MarginDecision::Insufficient(a) => a,
        }
    }

    pub fn is_sufficient(&self) -> bool {
        matches!(self, MarginDecision::Sufficient(_))
    }
}
