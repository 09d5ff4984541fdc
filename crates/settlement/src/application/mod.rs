mod account_locks;
mod context;
pub mod resolver;
pub mod use_cases;

pub use account_locks::AccountLocks;
pub use context::TradingContext;
pub use use_cases::{
    AccountQueries, CashMovementUseCase, EvaluateMarginUseCase, LedgerReconciliation,
    MarginQuery, PlaceTradingOrderCommand, PlaceTradingOrderUseCase, SettlementEngine,
    SubmitOrderCommand, SubmitOrderResult, SubmitOrderUseCase,
};
