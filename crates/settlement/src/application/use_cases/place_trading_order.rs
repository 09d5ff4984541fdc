use bourse_core::{
    InstrumentId, NewOrder, Order, OrderStatus, OrderType, Price, Quantity, Side, TimeInForce,
    TradingEvent, round_half_up,
};

use super::SettlementEngine;
use crate::application::TradingContext;
use crate::application::resolver::resolve_account;
use crate::domain::OrderValidator;
use crate::error::{EngineError, Result};

#[derive(Debug, Clone)]
pub struct PlaceTradingOrderCommand {
    pub trader_login: String,
    pub instrument_id: InstrumentId,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: Quantity,
    pub limit_price: Option<Price>,
    pub stop_price: Option<Price>,
    pub time_in_force: TimeInForce,
}

/// Direct trading path: no pre-trade margin check
///
/// Everything that can be validated is validated before the order is
/// persisted, so a failed request leaves no ACCEPTED order behind.
pub struct PlaceTradingOrderUseCase {
    ctx: TradingContext,
    engine: SettlementEngine,
}

impl PlaceTradingOrderUseCase {
    pub fn new(ctx: TradingContext) -> Self {
        Self {
            engine: SettlementEngine::new(ctx.clone()),
            ctx,
        }
    }

    pub async fn execute(&self, command: PlaceTradingOrderCommand) -> Result<Order> {
        let resolved = resolve_account(self.ctx.store.as_ref(), &command.trader_login).await?;
        let _guard = self.ctx.locks.lock(resolved.id).await;
        let account = self
            .ctx
            .store
            .get_account(resolved.id)
            .await
            .ok_or_else(|| EngineError::not_found("trading account", resolved.id))?;
        let instrument = self
            .ctx
            .instruments
            .get(command.instrument_id)
            .await
            .ok_or_else(|| EngineError::not_found("instrument", command.instrument_id))?;

        // Validate what will be persisted
        let quantity = round_half_up(command.quantity, 2);
        OrderValidator::validate_instrument(&instrument)?;
        OrderValidator::validate_account_type(&account)?;
        OrderValidator::validate_quantity(&instrument, quantity)?;
        OrderValidator::validate_shape(command.order_type, command.limit_price, command.stop_price)?;
        if let Some(price) = command.limit_price {
            OrderValidator::validate_price(&instrument, "limit price", price)?;
        }
        if let Some(price) = command.stop_price {
            OrderValidator::validate_price(&instrument, "stop price", price)?;
        }

        if command.side == Side::Sell {
            self.engine
                .check_sell_position(account.id, &instrument, quantity)
                .await?;
        }

        let order = self
            .ctx
            .store
            .insert_order(NewOrder {
                account_id: account.id,
                instrument_id: instrument.id,
                side: command.side,
                order_type: command.order_type,
                quantity,
                limit_price: command.limit_price.map(|p| instrument.normalized_price(p)),
                stop_price: command.stop_price.map(|p| instrument.normalized_price(p)),
                time_in_force: command.time_in_force,
                status: OrderStatus::Accepted,
                venue: instrument.exchange_code.clone(),
                created_at: self.ctx.clock.now(),
            })
            .await;

        tracing::info!(
            order_id = %order.id,
            account_id = %account.id,
            symbol = %instrument.symbol,
            side = %order.side,
            order_type = %order.order_type,
            %quantity,
            "trading order accepted"
        );
        self.ctx
            .notify(TradingEvent::OrderAccepted(order.clone()))
            .await;

        self.engine.process_order(order, &account, &instrument).await
    }
}
