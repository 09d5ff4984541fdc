use async_trait::async_trait;
use bourse_core::{Instrument, InstrumentId, MarginRule};

/// Read access to instruments owned by reference-data management
#[async_trait]
pub trait InstrumentRepository: Send + Sync {
    /// Get an instrument by numeric id
    async fn get(&self, id: InstrumentId) -> Option<Instrument>;

    /// Get an instrument by exact symbol
    async fn find_by_symbol(&self, symbol: &str) -> Option<Instrument>;

    /// Save or update an instrument (seeding/admin only)
    async fn save(&self, instrument: Instrument);

    /// Get all instruments
    async fn list(&self) -> Vec<Instrument>;
}

/// Margin rules keyed by scope (e.g. `NSE_CASH`)
#[async_trait]
pub trait MarginRuleRepository: Send + Sync {
    async fn find(&self, scope: &str) -> Option<MarginRule>;

    async fn save(&self, rule: MarginRule);
}
