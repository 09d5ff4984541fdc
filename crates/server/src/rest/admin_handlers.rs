//! Admin/Bootstrap handlers
//!
//! Not part of the trading API: used to fund accounts and move reference
//! prices when driving the simulator by hand or from tests.

use axum::{
    Json,
    extract::{Path, State},
};
use bourse_core::{AccountId, InstrumentId};
use std::sync::Arc;

use super::dto::{DepositRequest, LedgerEntryResponse, PriceResponse, SetPriceRequest};
use super::error::ApiError;
use super::handlers::parse_decimal;
use super::router::AppState;

/// POST /admin/accounts/{account_id}/deposit
pub async fn deposit(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<i64>,
    Json(req): Json<DepositRequest>,
) -> Result<Json<LedgerEntryResponse>, ApiError> {
    let amount = parse_decimal("amount", &req.amount)?;
    let description = req.description.as_deref().unwrap_or("deposit");

    let entry = state
        .bourse
        .deposit(AccountId::new(account_id), amount, description)
        .await?;
    Ok(Json(LedgerEntryResponse::from(&entry)))
}

/// PUT /admin/prices/{instrument_id}
pub async fn set_price(
    State(state): State<Arc<AppState>>,
    Path(instrument_id): Path<i64>,
    Json(req): Json<SetPriceRequest>,
) -> Result<Json<PriceResponse>, ApiError> {
    let price = parse_decimal("price", &req.price)?;
    let instrument = state
        .bourse
        .set_price(InstrumentId::new(instrument_id), price)
        .await?;

    tracing::info!(instrument = %instrument.symbol, %price, "reference price set");
    Ok(Json(PriceResponse::new(&instrument, price)))
}
