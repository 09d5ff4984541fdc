use serde::{Deserialize, Serialize};

use super::Side;
use crate::values::{
    AccountId, ExecutionId, InstrumentId, Money, OrderId, Price, Quantity, Timestamp,
};

/// Who provided the liquidity for a fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiquidityFlag {
    /// Filled against the reference price, no counterparty order
    SelfMatch,
}

/// Execution fields before the store assigns an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExecution {
    pub order_id: OrderId,
    pub account_id: AccountId,
    pub instrument_id: InstrumentId,
    pub side: Side,
    pub quantity: Quantity,
    pub price: Price,
    pub fee: Money,
    pub liquidity: LiquidityFlag,
    pub executed_at: Timestamp,
}

impl NewExecution {
    /// Gross value before fees
    pub fn notional(&self) -> Money {
        self.quantity * self.price
    }
}

/// Immutable record of one fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub id: ExecutionId,
    pub order_id: OrderId,
    pub account_id: AccountId,
    pub instrument_id: InstrumentId,
    pub side: Side,
    pub quantity: Quantity,
    pub price: Price,
    pub fee: Money,
    pub liquidity: LiquidityFlag,
    pub executed_at: Timestamp,
}

impl Execution {
    pub fn from_new(id: ExecutionId, new: NewExecution) -> Self {
        Self {
            id,
            order_id: new.order_id,
            account_id: new.account_id,
            instrument_id: new.instrument_id,
            side: new.side,
            quantity: new.quantity,
            price: new.price,
            fee: new.fee,
            liquidity: new.liquidity,
            executed_at: new.executed_at,
        }
    }
}
