use async_trait::async_trait;
use bourse_core::{Instrument, Price};

/// Source of the latest reference price
///
/// `None` means the instrument is not tradable right now. Implementations
/// must never substitute zero or a stale value.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    async fn latest_price(&self, instrument: &Instrument) -> Option<Price>;
}
