use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use bourse_core::{AccountId, InstrumentId, OrderStatus, OrderType, Side, TimeInForce};
use bourse_settlement::{PlaceTradingOrderCommand, SubmitOrderCommand};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::dto::*;
use super::error::ApiError;
use super::router::AppState;

/// Header carrying the authenticated trader login
pub const TRADER_HEADER: &str = "x-trader-login";

/// GET /api/v1/ping
pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {})
}

/// POST /api/v1/orders
pub async fn submit_order(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitOrderRequest>,
) -> Result<Json<SubmitOrderResponse>, ApiError> {
    let trader_login = extract_trader_login(&headers)?;

    let command = SubmitOrderCommand {
        trader_login,
        instrument: req.instrument,
        side: parse_side(&req.side)?,
        order_type: parse_order_type(&req.order_type)?,
        time_in_force: parse_time_in_force(req.time_in_force.as_deref())?,
        quantity: parse_decimal("quantity", &req.quantity)?,
        limit_price: parse_optional_decimal("limitPrice", req.limit_price.as_deref())?,
        stop_price: parse_optional_decimal("stopPrice", req.stop_price.as_deref())?,
    };

    let result = state.bourse.submit_order(command).await?;

    let execution = if result.order.status == OrderStatus::Filled {
        state
            .bourse
            .queries()
            .execution_for_order(result.order.id)
            .await?
    } else {
        None
    };

    Ok(Json(SubmitOrderResponse::new(&result, execution.as_ref())))
}

/// POST /api/v1/trading/orders
pub async fn place_trading_order(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(req): Json<PlaceTradingOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let trader_login = extract_trader_login(&headers)?;

    let command = PlaceTradingOrderCommand {
        trader_login,
        instrument_id: InstrumentId::new(req.instrument_id),
        side: parse_side(&req.side)?,
        order_type: parse_order_type(&req.order_type)?,
        quantity: parse_decimal("quantity", &req.quantity)?,
        limit_price: parse_optional_decimal("limitPrice", req.limit_price.as_deref())?,
        stop_price: parse_optional_decimal("stopPrice", req.stop_price.as_deref())?,
        time_in_force: parse_time_in_force(req.time_in_force.as_deref())?,
    };

    let order = state.bourse.place_trading_order(command).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// GET /api/v1/accounts/{account_id}
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<i64>,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state
        .bourse
        .queries()
        .account(AccountId::new(account_id))
        .await?;
    Ok(Json(AccountResponse::from(&account)))
}

/// GET /api/v1/accounts/{account_id}/positions
pub async fn get_positions(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<i64>,
) -> Result<Json<Vec<PositionResponse>>, ApiError> {
    let positions = state
        .bourse
        .queries()
        .positions(AccountId::new(account_id))
        .await?;
    Ok(Json(positions.iter().map(PositionResponse::from).collect()))
}

/// GET /api/v1/accounts/{account_id}/ledger
pub async fn get_ledger(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<i64>,
) -> Result<Json<Vec<LedgerEntryResponse>>, ApiError> {
    let entries = state
        .bourse
        .queries()
        .ledger(AccountId::new(account_id))
        .await?;
    Ok(Json(entries.iter().map(LedgerEntryResponse::from).collect()))
}

/// GET /api/v1/accounts/{account_id}/orders
pub async fn get_orders(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<i64>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state
        .bourse
        .queries()
        .orders(AccountId::new(account_id))
        .await?;
    Ok(Json(orders.iter().map(OrderResponse::from).collect()))
}

/// GET /api/v1/accounts/{account_id}/reconciliation
pub async fn get_reconciliation(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<i64>,
) -> Result<Json<ReconciliationResponse>, ApiError> {
    let report = state
        .bourse
        .queries()
        .reconcile_ledger(AccountId::new(account_id))
        .await?;
    Ok(Json(ReconciliationResponse::from(&report)))
}

fn extract_trader_login(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(TRADER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|login| !login.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::bad_request(format!("missing {} header", TRADER_HEADER)))
}

fn parse_side(value: &str) -> Result<Side, ApiError> {
    value
        .try_into()
        .map_err(|e: String| ApiError::invalid_parameter("side", &e))
}

fn parse_order_type(value: &str) -> Result<OrderType, ApiError> {
    value
        .try_into()
        .map_err(|e: String| ApiError::invalid_parameter("type", &e))
}

fn parse_time_in_force(value: Option<&str>) -> Result<TimeInForce, ApiError> {
    match value {
        Some(tif) => tif
            .try_into()
            .map_err(|e: String| ApiError::invalid_parameter("timeInForce", &e)),
        None => Ok(TimeInForce::default()),
    }
}

pub(super) fn parse_decimal(param: &str, value: &str) -> Result<Decimal, ApiError> {
    value
        .trim()
        .parse::<Decimal>()
        .map_err(|_| ApiError::invalid_parameter(param, "invalid decimal"))
}

fn parse_optional_decimal(param: &str, value: Option<&str>) -> Result<Option<Decimal>, ApiError> {
    value.map(|v| parse_decimal(param, v)).transpose()
}
