mod account;
mod execution;
mod ledger;
mod margin;
mod order;
mod order_status;
mod order_type;
mod position;
mod side;
mod time_in_force;

pub use account::{AccountError, AccountStatus, AccountType, TradingAccount};
pub use execution::{Execution, LiquidityFlag, NewExecution};
pub use ledger::{
    LedgerEntry, LedgerEntryType, NewLedgerEntry, ReconciliationError, continues_chain, reconcile,
};
pub use margin::{MarginAssessment, MarginDecision};
pub use order::{NewOrder, Order, OrderTransitionError};
pub use order_status::OrderStatus;
pub use order_type::OrderType;
pub use position::Position;
pub use side::Side;
pub use time_in_force::TimeInForce;
