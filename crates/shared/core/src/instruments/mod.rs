//! Reference data the trading core reads but never writes.

mod instrument;
mod margin_rule;

pub use instrument::{AssetClass, Instrument, InstrumentStatus};
pub use margin_rule::MarginRule;
