//! Fill-ability of an accepted order against the reference price.
//!
//! Orders self-match: a fill always happens at the oracle price, never at
//! the limit price.

use bourse_core::{Order, OrderType, Price, Side};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillDecision {
    Fill { price: Price },
    Reject { reason: String },
}

pub struct FillPolicy;

impl FillPolicy {
    pub fn decide(order: &Order, oracle_price: Price) -> FillDecision {
        match order.order_type {
            OrderType::Market => FillDecision::Fill {
                price: oracle_price,
            },
            OrderType::Limit => Self::limit(order.side, order.limit_price, oracle_price),
            OrderType::Stop => match Self::stop_triggered(order.side, order.stop_price, oracle_price)
            {
                Ok(()) => FillDecision::Fill {
                    price: oracle_price,
                },
                Err(reason) => FillDecision::Reject { reason },
            },
            OrderType::StopLimit => {
                match Self::stop_triggered(order.side, order.stop_price, oracle_price) {
                    Ok(()) => Self::limit(order.side, order.limit_price, oracle_price),
                    Err(reason) => FillDecision::Reject { reason },
                }
            }
        }
    }

    fn limit(side: Side, limit: Option<Price>, oracle_price: Price) -> FillDecision {
        let Some(limit) = limit else {
            return FillDecision::Reject {
                reason: "limit price missing".to_string(),
            };
        };
        let marketable = match side {
            Side::Buy => oracle_price <= limit,
            Side::Sell => oracle_price >= limit,
        };
        if marketable {
            FillDecision::Fill {
                price: oracle_price,
            }
        } else {
            FillDecision::Reject {
                reason: format!(
                    "limit not met: {side} limit {limit}, market price {oracle_price}"
                ),
            }
        }
    }

    fn stop_triggered(side: Side, stop: Option<Price>, oracle_price: Price) -> Result<(), String> {
        let Some(stop) = stop else {
            return Err("stop price missing".to_string());
        };
        let triggered = match side {
            Side::Buy => oracle_price >= stop,
            Side::Sell => oracle_price <= stop,
        };
        if triggered {
            Ok(())
        } else {
            Err(format!(
                "stop not triggered: {side} stop {stop}, market price {oracle_price}"
            ))
        }
    }
}
