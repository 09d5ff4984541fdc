//! Bourse Core Domain
//!
//! Pure domain types for the order-to-settlement pipeline.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod events;
pub mod instruments;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    AccountError, AccountStatus, AccountType, Execution, LedgerEntry, LedgerEntryType,
    LiquidityFlag, MarginAssessment, MarginDecision, NewExecution, NewLedgerEntry, NewOrder, Order,
    OrderStatus, OrderTransitionError, OrderType, Position, ReconciliationError, Side,
    TimeInForce, TradingAccount, continues_chain, reconcile,
};
pub use events::TradingEvent;
pub use instruments::{AssetClass, Instrument, InstrumentStatus, MarginRule};
pub use values::{
    AccountId, ExecutionId, InstrumentId, LedgerEntryId, Money, OrderId, Price, Quantity,
    Rounding, RoundingMode, Symbol, Timestamp, round_half_up,
};
