use bourse_core::{
    Instrument, MarginAssessment, MarginDecision, NewOrder, Order, OrderStatus, OrderType, Price,
    Quantity, Side, TimeInForce, TradingAccount, TradingEvent, round_half_up,
};
use bourse_ports::{AuditOutcome, AuditRecord};
use uuid::Uuid;

use super::{EvaluateMarginUseCase, SettlementEngine};
use crate::application::TradingContext;
use crate::application::resolver::{resolve_account, resolve_instrument};
use crate::domain::{OrderValidator, ValidationError};
use crate::error::{EngineError, Result};

const TRADER_ROLE: &str = "TRADER";

#[derive(Debug, Clone)]
pub struct SubmitOrderCommand {
    pub trader_login: String,
    /// Instrument symbol or numeric id
    pub instrument: String,
    pub side: Side,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    pub quantity: Quantity,
    pub limit_price: Option<Price>,
    pub stop_price: Option<Price>,
}

#[derive(Debug, Clone)]
pub struct SubmitOrderResult {
    /// The order in its final state (FILLED or REJECTED)
    pub order: Order,
    pub margin_assessment: MarginAssessment,
}

/// Order admission followed by synchronous settlement
pub struct SubmitOrderUseCase {
    ctx: TradingContext,
    margin: EvaluateMarginUseCase,
    engine: SettlementEngine,
}

impl SubmitOrderUseCase {
    pub fn new(ctx: TradingContext) -> Self {
        Self {
            margin: EvaluateMarginUseCase::new(ctx.clone()),
            engine: SettlementEngine::new(ctx.clone()),
            ctx,
        }
    }

    pub async fn execute(&self, command: SubmitOrderCommand) -> Result<SubmitOrderResult> {
        let outcome = self.admit_and_settle(&command).await;
        self.audit(&command, &outcome).await;
        outcome
    }

    async fn admit_and_settle(&self, command: &SubmitOrderCommand) -> Result<SubmitOrderResult> {
        let resolved = resolve_account(self.ctx.store.as_ref(), &command.trader_login).await?;
        let _guard = self.ctx.locks.lock(resolved.id).await;
        let account = self.refresh(&resolved).await?;
        let instrument =
            resolve_instrument(self.ctx.instruments.as_ref(), &command.instrument).await?;

        // Validate what will be persisted
        let quantity = round_half_up(command.quantity, 2);
        OrderValidator::validate_admission(
            &account,
            &instrument,
            command.order_type,
            quantity,
            command.limit_price,
            command.stop_price,
        )?;

        let limit_price = command.limit_price.map(|p| instrument.normalized_price(p));
        let stop_price = command.stop_price.map(|p| instrument.normalized_price(p));

        if command.side == Side::Sell {
            self.engine
                .check_sell_position(account.id, &instrument, quantity)
                .await?;
        }

        let margin_price = self.margin_price(&instrument, limit_price).await?;
        let margin_assessment = match self
            .margin
            .assess(&account, &instrument, command.side, quantity, margin_price)
            .await?
        {
            MarginDecision::Sufficient(assessment) => assessment,
            MarginDecision::Insufficient(assessment) => {
                return Err(EngineError::InsufficientMargin(Box::new(assessment)));
            }
        };

        let now = self.ctx.clock.now();
        let order = self
            .ctx
            .store
            .insert_order(NewOrder {
                account_id: account.id,
                instrument_id: instrument.id,
                side: command.side,
                order_type: command.order_type,
                quantity,
                limit_price,
                stop_price,
                time_in_force: command.time_in_force,
                status: OrderStatus::Accepted,
                venue: instrument.exchange_code.clone(),
                created_at: now,
            })
            .await;

        tracing::info!(
            order_id = %order.id,
            account_id = %account.id,
            symbol = %instrument.symbol,
            side = %order.side,
            order_type = %order.order_type,
            %quantity,
            "order accepted"
        );
        self.ctx
            .notify(TradingEvent::OrderAccepted(order.clone()))
            .await;

        let order = self.engine.process_order(order, &account, &instrument).await?;
        Ok(SubmitOrderResult {
            order,
            margin_assessment,
        })
    }

    /// Limit price when given, otherwise the current reference price
    async fn margin_price(&self, instrument: &Instrument, limit: Option<Price>) -> Result<Price> {
        if let Some(limit) = limit {
            return Ok(limit);
        }
        self.ctx
            .oracle
            .latest_price(instrument)
            .await
            .ok_or_else(|| {
                ValidationError::new(
                    "price",
                    format!(
                        "no price available for {} to assess margin against",
                        instrument.symbol
                    ),
                )
                .into()
            })
    }

    /// Re-read the account now that its lock is held
    async fn refresh(&self, account: &TradingAccount) -> Result<TradingAccount> {
        self.ctx
            .store
            .get_account(account.id)
            .await
            .ok_or_else(|| EngineError::not_found("trading account", account.id))
    }

    async fn audit(&self, command: &SubmitOrderCommand, outcome: &Result<SubmitOrderResult>) {
        let (order_id, status, audit_outcome, reason, assessment) = match outcome {
            Ok(result) => {
                let audit_outcome = if result.order.status == OrderStatus::Rejected {
                    AuditOutcome::Rejected
                } else {
                    AuditOutcome::Accepted
                };
                (
                    Some(result.order.id),
                    Some(result.order.status),
                    audit_outcome,
                    result.order.rejection_reason.clone(),
                    Some(result.margin_assessment.clone()),
                )
            }
            Err(err) => {
                let audit_outcome = match err {
                    EngineError::Validation(_)
                    | EngineError::NotFound { .. }
                    | EngineError::InsufficientMargin(_) => AuditOutcome::Rejected,
                    _ => AuditOutcome::Error,
                };
                (
                    None,
                    None,
                    audit_outcome,
                    Some(err.to_string()),
                    err.assessment().cloned(),
                )
            }
        };

        self.ctx
            .audit
            .record(AuditRecord {
                id: Uuid::new_v4(),
                actor: command.trader_login.clone(),
                role: TRADER_ROLE.to_string(),
                instrument: command.instrument.clone(),
                order_id,
                status,
                outcome: audit_outcome,
                reason,
                assessment,
                requested_quantity: command.quantity,
                requested_price: command.limit_price,
                recorded_at: self.ctx.clock.now(),
            })
            .await;
    }
}
