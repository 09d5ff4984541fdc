//! Events published to account subscribers after order state changes.

use serde::{Deserialize, Serialize};

use crate::entities::{Execution, Order};
use crate::values::AccountId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "camelCase")]
pub enum TradingEvent {
    /// Order passed admission
    OrderAccepted(Order),
    /// Order reached REJECTED during settlement
    OrderRejected(Order),
    /// Order filled against the reference price
    OrderFilled { order: Order, execution: Execution },
}

impl TradingEvent {
    pub fn account_id(&self) -> AccountId {
        self.order().account_id
    }

    pub fn order(&self) -> &Order {
        match self {
            TradingEvent::OrderAccepted(order) | TradingEvent::OrderRejected(order) => order,
            TradingEvent::OrderFilled { order, .. } => order,
        }
    }
}
