mod account_queries;
mod cash_movement;
mod evaluate_margin;
mod place_trading_order;
mod settle_order;
mod submit_order;

pub use account_queries::{AccountQueries, LedgerReconciliation};
pub use cash_movement::CashMovementUseCase;
pub use evaluate_margin::{EvaluateMarginUseCase, MarginQuery};
pub use place_trading_order::{PlaceTradingOrderCommand, PlaceTradingOrderUseCase};
pub use settle_order::SettlementEngine;
pub use submit_order::{SubmitOrderCommand, SubmitOrderResult, SubmitOrderUseCase};
