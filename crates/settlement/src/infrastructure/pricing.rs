use async_trait::async_trait;
use bourse_core::{Instrument, InstrumentId, Price};
use bourse_ports::PriceOracle;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Reference prices set by an admin operation or seed configuration
///
/// An instrument without a stored price has no price; zero is never
/// reported.
#[derive(Default)]
pub struct StaticPriceOracle {
    prices: Arc<DashMap<InstrumentId, Price>>,
}

impl StaticPriceOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reference price; non-positive prices remove it
    pub fn set_price(&self, instrument_id: InstrumentId, price: Price) {
        if price > Decimal::ZERO {
            self.prices.insert(instrument_id, price);
        } else {
            self.prices.remove(&instrument_id);
        }
        tracing::debug!(%instrument_id, %price, "reference price updated");
    }

    pub fn clear_price(&self, instrument_id: InstrumentId) {
        self.prices.remove(&instrument_id);
    }

    pub fn price(&self, instrument_id: InstrumentId) -> Option<Price> {
        self.prices.get(&instrument_id).map(|p| *p)
    }
}

impl Clone for StaticPriceOracle {
    fn clone(&self) -> Self {
        Self {
            prices: Arc::clone(&self.prices),
        }
    }
}

#[async_trait]
impl PriceOracle for StaticPriceOracle {
    async fn latest_price(&self, instrument: &Instrument) -> Option<Price> {
        let price = self.price(instrument.id);
        tracing::debug!(symbol = %instrument.symbol, ?price, "oracle lookup");
        price
    }
}
