//! Bourse Ports
//!
//! Port definitions (traits) for the order-to-settlement pipeline.
//! These define the boundaries between domain logic and infrastructure.

mod audit;
mod clock;
mod error;
mod notification;
mod persistence;
mod pricing;
mod reference_data;

pub use audit::{AuditOutcome, AuditRecord, AuditSink};
pub use clock::Clock;
pub use error::{NotificationError, StoreError};
pub use notification::NotificationPublisher;
pub use persistence::{
    AccountRegistration, AccountRepository, CommittedSettlement, ExecutionRepository,
    LedgerRepository, OrderRepository, PositionRepository, SettlementBatch, SettlementStore,
    TradingStore,
};
pub use pricing::PriceOracle;
pub use reference_data::{InstrumentRepository, MarginRuleRepository};
