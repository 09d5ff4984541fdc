pub mod audit;
pub mod clock;
pub mod config;
pub mod event_publisher;
pub mod pricing;
pub mod repositories;

pub use audit::{InMemoryAuditLog, TracingAuditSink};
pub use clock::{FixedClock, SystemClock};
pub use config::{
    AccountConfig, BourseConfig, ConfigError, InstrumentConfig, PriceConfig, ServerConfig,
};
pub use event_publisher::BroadcastNotificationPublisher;
pub use pricing::StaticPriceOracle;
pub use repositories::{
    InMemoryInstrumentRepository, InMemoryMarginRuleRepository, InMemoryTradingStore,
};
