mod ids;
mod money;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub use ids::{AccountId, ExecutionId, InstrumentId, LedgerEntryId, OrderId};
pub use money::{Rounding, RoundingMode, round_half_up};

/// Price value - uses Decimal for precision
pub type Price = Decimal;

/// Quantity value - uses Decimal for precision
pub type Quantity = Decimal;

/// Cash amount in the account's base currency
pub type Money = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Symbol identifier for a tradeable instrument
pub type Symbol = String;
