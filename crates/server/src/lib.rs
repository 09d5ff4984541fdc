//! Bourse Server
//!
//! REST surface over the order-to-settlement pipeline in
//! `bourse-settlement`. Trading endpoints live under `/api/v1`, bootstrap
//! endpoints (deposits, reference prices) under `/admin`.

pub mod rest;

pub use rest::{ApiError, AppState, create_router};
