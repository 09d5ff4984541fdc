//! Pure settlement rules: validation, margin and fill-ability.

pub mod services;

pub use services::{FillDecision, FillPolicy, MarginCalculator, OrderValidator, ValidationError};
