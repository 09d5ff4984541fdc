//! Position held by a trading account in one instrument.
//!
//! Average cost is a quantity-weighted blend that only BUY fills move.
//! SELL fills reduce quantity and realize P&L against the unchanged average
//! cost. A position that reaches zero quantity is kept, flat.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::values::{AccountId, InstrumentId, Money, Price, Quantity, Rounding, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub account_id: AccountId,
    pub instrument_id: InstrumentId,
    pub quantity: Quantity,
    /// Average cost basis
    pub avg_cost: Price,
    /// Last known price, used for unrealized P&L
    pub last_price: Option<Price>,
    pub unrealized_pnl: Money,
    /// Realized P&L accumulated across SELL fills
    pub realized_pnl: Money,
    pub updated_at: Timestamp,
}

impl Position {
    /// Open a position from a first BUY fill
    pub fn open(
        account_id: AccountId,
        instrument_id: InstrumentId,
        quantity: Quantity,
        price: Price,
        now: Timestamp,
    ) -> Self {
        Self {
            account_id,
            instrument_id,
            quantity,
            avg_cost: price,
            last_price: Some(price),
            unrealized_pnl: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            updated_at: now,
        }
    }

    /// Blend a BUY fill into the average cost
    pub fn apply_buy(&mut self, quantity: Quantity, price: Price, rounding: Rounding, now: Timestamp) {
        let new_qty = self.quantity + quantity;
        if new_qty > Decimal::ZERO {
            let total_cost = self.quantity * self.avg_cost + quantity * price;
            self.avg_cost = rounding.apply(total_cost / new_qty);
        }
        self.quantity = new_qty;
        self.mark(price, rounding);
        self.updated_at = now;
    }

    /// Reduce the position by a SELL fill, returning the realized P&L of the
    /// fill. The running `realized_pnl` only moves when `accumulate` is set.
    pub fn apply_sell(
        &mut self,
        quantity: Quantity,
        price: Price,
        rounding: Rounding,
        accumulate: bool,
        now: Timestamp,
    ) -> Money {
        let realized = rounding.apply((price - self.avg_cost) * quantity);
        self.quantity -= quantity;
        if accumulate {
            self.realized_pnl = rounding.apply(self.realized_pnl + realized);
        }
        self.mark(price, rounding);
        self.updated_at = now;
        realized
    }

    /// Set the last price and recompute unrealized P&L
    pub fn mark(&mut self, last_price: Price, rounding: Rounding) {
        self.last_price = Some(last_price);
        self.recompute_unrealized(rounding);
    }

    fn recompute_unrealized(&mut self, rounding: Rounding) {
        self.unrealized_pnl = match self.last_price {
            Some(last) if self.quantity > Decimal::ZERO => {
                rounding.apply((last - self.avg_cost) * self.quantity)
            }
            _ => Decimal::ZERO,
        };
    }

    pub fn is_flat(&self) -> bool {
        self.quantity.is_zero()
    }
}
