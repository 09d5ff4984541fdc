use bourse_core::{MarginAssessment, MarginDecision, MarginRule, Money, Price, Quantity, Rounding};
use rust_decimal::Decimal;

/// Percentage-of-notional margin calculation
///
/// The whole account balance is the margin basis. A request is never clamped
/// or partially admitted: it is either sufficient or it is not.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarginCalculator {
    rounding: Rounding,
}

impl MarginCalculator {
    pub fn new(rounding: Rounding) -> Self {
        Self { rounding }
    }

    pub fn notional(&self, quantity: Quantity, price: Price) -> Money {
        self.rounding.apply(price * quantity)
    }

    pub fn assess(
        &self,
        rule: &MarginRule,
        balance: Money,
        quantity: Quantity,
        price: Price,
    ) -> MarginDecision {
        let notional = self.notional(quantity, price);
        let initial_requirement = self.rounding.apply(notional * rule.initial_pct);
        let maintenance_requirement = self.rounding.apply(notional * rule.maintenance_pct);
        let remaining_balance = self.rounding.apply(balance - initial_requirement);
        let sufficient = remaining_balance >= Decimal::ZERO;

        let assessment = MarginAssessment {
            scope: rule.scope.clone(),
            notional,
            initial_requirement,
            maintenance_requirement,
            available_balance: balance,
            remaining_balance,
            sufficient,
        };

        if sufficient {
            MarginDecision::Sufficient(assessment)
        } else {
            MarginDecision::Insufficient(assessment)
        }
    }
}
