mod in_memory_instrument;
mod in_memory_margin_rule;
mod in_memory_store;

pub use in_memory_instrument::InMemoryInstrumentRepository;
pub use in_memory_margin_rule::InMemoryMarginRuleRepository;
pub use in_memory_store::InMemoryTradingStore;
