//! Execution & settlement of accepted orders.
//!
//! The caller holds the account lock. Everything with a cash effect
//! (execution, position, ledger entry, balance, FILLED order) reaches the
//! store in one [`SettlementBatch`]; outcomes without one (no price, limit
//! not met, stop not triggered, insufficient funds) only move the order to
//! REJECTED.

use bourse_core::{
    AccountId, Execution, Instrument, LedgerEntryType, LiquidityFlag, NewExecution,
    NewLedgerEntry, Order, Position, Quantity, Side, TradingAccount, TradingEvent,
};
use bourse_ports::SettlementBatch;
use rust_decimal::Decimal;

use crate::application::TradingContext;
use crate::domain::{FillDecision, FillPolicy, OrderValidator, ValidationError};
use crate::error::{EngineError, Result};

pub struct SettlementEngine {
    ctx: TradingContext,
}

impl SettlementEngine {
    pub fn new(ctx: TradingContext) -> Self {
        Self { ctx }
    }

    /// Settle an ACCEPTED order; returns it FILLED or REJECTED
    pub async fn process_order(
        &self,
        order: Order,
        account: &TradingAccount,
        instrument: &Instrument,
    ) -> Result<Order> {
        match order.side {
            Side::Buy => self.process_buy_order(order, account, instrument).await,
            Side::Sell => self.process_sell_order(order, account, instrument).await,
        }
    }

    pub async fn process_buy_order(
        &self,
        order: Order,
        account: &TradingAccount,
        instrument: &Instrument,
    ) -> Result<Order> {
        OrderValidator::validate_for_settlement(&order, account, instrument)?;

        let price = match self.fill_price(&order, instrument).await {
            Ok(price) => price,
            Err(reason) => return self.reject(order, reason).await,
        };

        let rounding = self.ctx.config.rounding();
        let fee = self.ctx.config.fee();
        let total_cost = rounding.apply(order.quantity * price + fee);
        if account.balance < total_cost {
            let reason = format!(
                "insufficient funds: required {total_cost}, available {}",
                account.balance
            );
            return self.reject(order, reason).await;
        }

        let now = self.ctx.clock.now();
        let mut account = account.clone();
        account.debit(total_cost, now)?;

        let position = match self
            .ctx
            .store
            .find_position(account.id, instrument.id)
            .await
        {
            Some(mut position) => {
                position.apply_buy(order.quantity, price, rounding, now);
                position
            }
            None => Position::open(account.id, instrument.id, order.quantity, price, now),
        };

        let ledger_entry = NewLedgerEntry {
            account_id: account.id,
            entry_type: LedgerEntryType::Debit,
            amount: total_cost,
            fee,
            currency: account.currency.clone(),
            description: format!("BUY {} x{} @ {}", instrument.symbol, order.quantity, price),
            reference: order.reference(),
            balance_after: account.balance,
            created_at: now,
        };

        self.commit_fill(order, account, instrument, price, fee, position, ledger_entry)
            .await
    }

    pub async fn process_sell_order(
        &self,
        order: Order,
        account: &TradingAccount,
        instrument: &Instrument,
    ) -> Result<Order> {
        OrderValidator::validate_for_settlement(&order, account, instrument)?;
        let mut position = self
            .check_sell_position(account.id, instrument, order.quantity)
            .await?;

        let price = match self.fill_price(&order, instrument).await {
            Ok(price) => price,
            Err(reason) => return self.reject(order, reason).await,
        };

        let rounding = self.ctx.config.rounding();
        let fee = self.ctx.config.fee();
        let net = rounding.apply(order.quantity * price) - fee;

        let now = self.ctx.clock.now();
        let mut account = account.clone();
        if account.apply_signed(net, now).is_err() {
            let reason = format!(
                "insufficient funds: fee {fee} exceeds proceeds, available {}",
                account.balance
            );
            return self.reject(order, reason).await;
        }

        let realized = position.apply_sell(
            order.quantity,
            price,
            rounding,
            self.ctx.config.accumulate_realized_pnl,
            now,
        );

        let mut description = format!("SELL {} x{} @ {}", instrument.symbol, order.quantity, price);
        if !realized.is_zero() {
            description.push_str(&format!(" (realized P&L {realized})"));
        }

        let ledger_entry = NewLedgerEntry {
            account_id: account.id,
            entry_type: if net < Decimal::ZERO {
                LedgerEntryType::Debit
            } else {
                LedgerEntryType::Credit
            },
            amount: net.abs(),
            fee,
            currency: account.currency.clone(),
            description,
            reference: order.reference(),
            balance_after: account.balance,
            created_at: now,
        };

        self.commit_fill(order, account, instrument, price, fee, position, ledger_entry)
            .await
    }

    /// A SELL needs an existing position covering its quantity
    pub async fn check_sell_position(
        &self,
        account_id: AccountId,
        instrument: &Instrument,
        quantity: Quantity,
    ) -> Result<Position> {
        let position = self
            .ctx
            .store
            .find_position(account_id, instrument.id)
            .await
            .ok_or_else(|| {
                ValidationError::new(
                    "position",
                    format!("no position in {} to sell", instrument.symbol),
                )
            })?;

        if position.quantity < quantity {
            return Err(ValidationError::new(
                "position",
                format!(
                    "insufficient position in {}: holding {}, selling {}",
                    instrument.symbol, position.quantity, quantity
                ),
            )
            .into());
        }
        Ok(position)
    }

    /// Oracle lookup plus fill-ability; `Err` carries the rejection reason
    async fn fill_price(
        &self,
        order: &Order,
        instrument: &Instrument,
    ) -> std::result::Result<Decimal, String> {
        let Some(oracle_price) = self.ctx.oracle.latest_price(instrument).await else {
            return Err("no price available".to_string());
        };
        match FillPolicy::decide(order, oracle_price) {
            FillDecision::Fill { price } => Ok(self.ctx.config.rounding().apply(price)),
            FillDecision::Reject { reason } => Err(reason),
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn commit_fill(
        &self,
        mut order: Order,
        account: TradingAccount,
        instrument: &Instrument,
        price: Decimal,
        fee: Decimal,
        position: Position,
        ledger_entry: NewLedgerEntry,
    ) -> Result<Order> {
        let now = ledger_entry.created_at;
        order.fill(now)?;

        let execution = NewExecution {
            order_id: order.id,
            account_id: account.id,
            instrument_id: instrument.id,
            side: order.side,
            quantity: order.quantity,
            price,
            fee,
            liquidity: LiquidityFlag::SelfMatch,
            executed_at: now,
        };

        let committed = self
            .ctx
            .store
            .commit(SettlementBatch {
                account,
                ledger_entry,
                order: Some(order),
                execution: Some(execution),
                position: Some(position),
            })
            .await?;

        let (order, execution) = Self::filled(committed.order, committed.execution)?;
        tracing::info!(
            order_id = %order.id,
            account_id = %order.account_id,
            symbol = %instrument.symbol,
            side = %order.side,
            quantity = %order.quantity,
            %price,
            balance = %committed.account.balance,
            "order filled"
        );

        self.ctx
            .notify(TradingEvent::OrderFilled {
                order: order.clone(),
                execution,
            })
            .await;
        Ok(order)
    }

    fn filled(order: Option<Order>, execution: Option<Execution>) -> Result<(Order, Execution)> {
        match (order, execution) {
            (Some(order), Some(execution)) => Ok((order, execution)),
            _ => Err(EngineError::Internal(
                "store did not return the settled order and execution".to_string(),
            )),
        }
    }

    async fn reject(&self, mut order: Order, reason: String) -> Result<Order> {
        order.reject(reason, self.ctx.clock.now())?;
        self.ctx.store.update_order(&order).await?;

        tracing::warn!(
            order_id = %order.id,
            account_id = %order.account_id,
            side = %order.side,
            reason = order.rejection_reason.as_deref().unwrap_or_default(),
            "order rejected"
        );

        self.ctx
            .notify(TradingEvent::OrderRejected(order.clone()))
            .await;
        Ok(order)
    }
}
