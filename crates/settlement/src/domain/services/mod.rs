mod fill_policy;
mod margin_calculator;
mod order_validator;

pub use fill_policy::{FillDecision, FillPolicy};
pub use margin_calculator::MarginCalculator;
pub use order_validator::{OrderValidator, ValidationError};
