use bourse_core::{Instrument, MarginDecision, Price, Quantity, Side, TradingAccount};
use rust_decimal::Decimal;

use crate::application::TradingContext;
use crate::application::resolver::{resolve_account, resolve_instrument, resolve_margin_rule};
use crate::domain::{MarginCalculator, ValidationError};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct MarginQuery {
    pub trader_login: String,
    /// Instrument symbol or numeric id
    pub instrument: String,
    pub side: Side,
    pub quantity: Quantity,
    pub price: Price,
}

/// Pre-trade margin sufficiency check
pub struct EvaluateMarginUseCase {
    ctx: TradingContext,
    calculator: MarginCalculator,
}

impl EvaluateMarginUseCase {
    pub fn new(ctx: TradingContext) -> Self {
        let calculator = MarginCalculator::new(ctx.config.rounding());
        Self { ctx, calculator }
    }

    pub async fn execute(&self, query: MarginQuery) -> Result<MarginDecision> {
        Self::check_inputs(query.quantity, query.price)?;
        let account = resolve_account(self.ctx.store.as_ref(), &query.trader_login).await?;
        let instrument =
            resolve_instrument(self.ctx.instruments.as_ref(), &query.instrument).await?;
        self.assess(&account, &instrument, query.side, query.quantity, query.price)
            .await
    }

    /// Assess an already resolved account and instrument
    pub async fn assess(
        &self,
        account: &TradingAccount,
        instrument: &Instrument,
        side: Side,
        quantity: Quantity,
        price: Price,
    ) -> Result<MarginDecision> {
        Self::check_inputs(quantity, price)?;
        let rule = resolve_margin_rule(self.ctx.margin_rules.as_ref(), instrument).await?;
        let decision = self
            .calculator
            .assess(&rule, account.balance, quantity, price);

        let a = decision.assessment();
        if decision.is_sufficient() {
            tracing::debug!(
                account_id = %account.id,
                symbol = %instrument.symbol,
                %side,
                scope = %a.scope,
                notional = %a.notional,
                initial = %a.initial_requirement,
                maintenance = %a.maintenance_requirement,
                remaining = %a.remaining_balance,
                "margin sufficient"
            );
        } else {
            tracing::warn!(
                account_id = %account.id,
                symbol = %instrument.symbol,
                %side,
                scope = %a.scope,
                notional = %a.notional,
                initial = %a.initial_requirement,
                available = %a.available_balance,
                shortfall = %a.shortfall(),
                "margin insufficient"
            );
        }

        Ok(decision)
    }

    fn check_inputs(quantity: Quantity, price: Price) -> Result<()> {
        if quantity <= Decimal::ZERO {
            return Err(ValidationError::new(
                "quantity",
                format!("quantity must be positive, got {quantity}"),
            )
            .into());
        }
        if price <= Decimal::ZERO {
            return Err(ValidationError::new(
                "price",
                format!("price must be positive, got {price}"),
            )
            .into());
        }
        Ok(())
    }
}
