use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{OrderStatus, OrderType, Side, TimeInForce};
use crate::values::{AccountId, InstrumentId, OrderId, Price, Quantity, Timestamp};

/// Attempted a transition the order state machine forbids
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("order {order_id} cannot move from {from} to {to}")]
pub struct OrderTransitionError {
    pub order_id: OrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// Order fields before the store assigns an id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub account_id: AccountId,
    pub instrument_id: InstrumentId,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: Quantity,
    /// Required for Limit and StopLimit orders
    pub limit_price: Option<Price>,
    /// Required for Stop and StopLimit orders
    pub stop_price: Option<Price>,
    pub time_in_force: TimeInForce,
    pub status: OrderStatus,
    /// Exchange code of the instrument
    pub venue: String,
    pub created_at: Timestamp,
}

/// One trading intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub account_id: AccountId,
    pub instrument_id: InstrumentId,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: Quantity,
    pub limit_price: Option<Price>,
    pub stop_price: Option<Price>,
    pub time_in_force: TimeInForce,
    pub status: OrderStatus,
    pub venue: String,
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    /// Materialize a draft with its store-assigned id
    pub fn from_new(id: OrderId, new: NewOrder) -> Self {
        Self {
            id,
            account_id: new.account_id,
            instrument_id: new.instrument_id,
            side: new.side,
            order_type: new.order_type,
            quantity: new.quantity,
            limit_price: new.limit_price,
            stop_price: new.stop_price,
            time_in_force: new.time_in_force,
            status: new.status,
            venue: new.venue,
            rejection_reason: None,
            created_at: new.created_at,
            updated_at: new.created_at,
        }
    }

    /// Ledger/audit reference for this order
    pub fn reference(&self) -> String {
        format!("ORD-{}", self.id)
    }

    pub fn accept(&mut self, now: Timestamp) -> Result<(), OrderTransitionError> {
        self.transition(OrderStatus::Accepted, now)
    }

    pub fn fill(&mut self, now: Timestamp) -> Result<(), OrderTransitionError> {
        self.transition(OrderStatus::Filled, now)
    }

    pub fn reject(
        &mut self,
        reason: impl Into<String>,
        now: Timestamp,
    ) -> Result<(), OrderTransitionError> {
        self.transition(OrderStatus::Rejected, now)?;
        self.rejection_reason = Some(reason.into());
        Ok(())
    }

    fn transition(&mut self, to: OrderStatus, now: Timestamp) -> Result<(), OrderTransitionError> {
        if !self.status.can_transition_to(to) {
            return Err(OrderTransitionError {
                order_id: self.id,
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.updated_at = now;
        Ok(())
    }

    /// Notional at the limit price, if one is set
    pub fn limit_notional(&self) -> Option<Decimal> {
        self.limit_price.map(|p| p * self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn order() -> Order {
        Order::from_new(
            OrderId::new(9),
            NewOrder {
                account_id: AccountId::new(1),
                instrument_id: InstrumentId::new(2),
                side: Side::Buy,
                order_type: OrderType::Limit,
                quantity: dec!(10),
                limit_price: Some(dec!(101.50)),
                stop_price: None,
                time_in_force: TimeInForce::Day,
                status: OrderStatus::New,
                venue: "NSE".to_string(),
                created_at: Utc::now(),
            },
        )
    }

    #[test]
    fn test_reference() {
        assert_eq!(order().reference(), "ORD-9");
    }

    #[test]
    fn test_accept_then_fill() {
        let mut o = order();
        let now = Utc::now();
        o.accept(now).unwrap();
        o.fill(now).unwrap();
        assert_eq!(o.status, OrderStatus::Filled);
        assert!(o.reject("late", now).is_err());
        assert!(o.rejection_reason.is_none());
    }

    #[test]
    fn test_reject_records_reason() {
        let mut o = order();
        let now = Utc::now();
        o.accept(now).unwrap();
        o.reject("no price available", now).unwrap();
        assert_eq!(o.rejection_reason.as_deref(), Some("no price available"));

        let err = o.fill(now).unwrap_err();
        assert_eq!(err.from, OrderStatus::Rejected);
        assert_eq!(err.to, OrderStatus::Filled);
    }

    #[test]
    fn test_cannot_fill_new_order() {
        let mut o = order();
        assert!(o.fill(Utc::now()).is_err());
        assert_eq!(o.limit_notional(), Some(dec!(1015.00)));
    }
}
