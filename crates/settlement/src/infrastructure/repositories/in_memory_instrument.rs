use async_trait::async_trait;
use bourse_core::{Instrument, InstrumentId};
use bourse_ports::InstrumentRepository;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory instrument reference data
///
/// Keyed by id with a symbol index for the two-step resolver.
pub struct InMemoryInstrumentRepository {
    instruments: Arc<DashMap<InstrumentId, Instrument>>,
    /// Index: symbol -> instrument id
    symbol_index: Arc<DashMap<String, InstrumentId>>,
}

impl InMemoryInstrumentRepository {
    pub fn new() -> Self {
        Self {
            instruments: Arc::new(DashMap::new()),
            symbol_index: Arc::new(DashMap::new()),
        }
    }

    pub fn with_instruments(instruments: impl IntoIterator<Item = Instrument>) -> Self {
        let repo = Self::new();
        for instrument in instruments {
            repo.add(instrument);
        }
        repo
    }

    /// Synchronous insert used while seeding
    pub fn add(&self, instrument: Instrument) {
        if let Some(previous) = self.instruments.get(&instrument.id) {
            if previous.symbol != instrument.symbol {
                self.symbol_index.remove(&previous.symbol);
            }
        }
        self.symbol_index
            .insert(instrument.symbol.clone(), instrument.id);
        self.instruments.insert(instrument.id, instrument);
    }
}

impl Default for InMemoryInstrumentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryInstrumentRepository {
    fn clone(&self) -> Self {
        Self {
            instruments: Arc::clone(&self.instruments),
            symbol_index: Arc::clone(&self.symbol_index),
        }
    }
}

#[async_trait]
impl InstrumentRepository for InMemoryInstrumentRepository {
    async fn get(&self, id: InstrumentId) -> Option<Instrument> {
        self.instruments.get(&id).map(|i| i.clone())
    }

    async fn find_by_symbol(&self, symbol: &str) -> Option<Instrument> {
        let id = *self.symbol_index.get(symbol)?;
        self.instruments.get(&id).map(|i| i.clone())
    }

    async fn save(&self, instrument: Instrument) {
        self.add(instrument);
    }

    async fn list(&self) -> Vec<Instrument> {
        let mut instruments: Vec<Instrument> =
            self.instruments.iter().map(|e| e.value().clone()).collect();
        instruments.sort_by_key(|i| i.id);
        instruments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bourse_core::AssetClass;

    #[tokio::test]
    async fn test_lookup_by_id_and_symbol() {
        let repo = InMemoryInstrumentRepository::with_instruments([
            Instrument::new(InstrumentId::new(7), "INFY", AssetClass::Equity, "NSE"),
            Instrument::new(InstrumentId::new(8), "GOLD", AssetClass::Commodity, "MCX"),
        ]);

        assert_eq!(repo.get(InstrumentId::new(8)).await.unwrap().symbol, "GOLD");
        assert_eq!(
            repo.find_by_symbol("INFY").await.unwrap().id,
            InstrumentId::new(7)
        );
        assert!(repo.find_by_symbol("TCS").await.is_none());
        assert_eq!(repo.list().await.len(), 2);
    }

    #[tokio::test]
    async fn test_renamed_symbol_drops_old_index() {
        let repo = InMemoryInstrumentRepository::new();
        repo.save(Instrument::new(InstrumentId::new(1), "OLD", AssetClass::Equity, "NSE"))
            .await;
        repo.save(Instrument::new(InstrumentId::new(1), "NEW", AssetClass::Equity, "NSE"))
            .await;

        assert!(repo.find_by_symbol("OLD").await.is_none());
        assert!(repo.find_by_symbol("NEW").await.is_some());
    }
}
