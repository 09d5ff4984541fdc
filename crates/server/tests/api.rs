//! Integration tests for the REST API
//!
//! Drives the full router with `tower::ServiceExt::oneshot`:
//! - order submission through both paths
//! - error mapping and error bodies
//! - account read side and admin endpoints

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use bourse_core::{AccountType, MarginRule};
use bourse_server::{AppState, create_router};
use bourse_settlement::{AccountConfig, Bourse, BourseConfig, InstrumentConfig, PriceConfig};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// Test Fixtures
// ============================================================================

async fn create_test_app(opening_balance: Decimal) -> Router {
    let config = BourseConfig {
        instruments: vec![InstrumentConfig::equity(
            1,
            "INFY",
            "NSE",
            dec!(0.05),
            dec!(10),
        )],
        margin_rules: vec![MarginRule::new("NSE_CASH", dec!(0.20), dec!(0.10))],
        accounts: vec![AccountConfig {
            trader_login: "alice".to_string(),
            broker_code: "BRK1".to_string(),
            currency: "INR".to_string(),
            account_type: AccountType::Cash,
            opening_balance,
        }],
        prices: vec![PriceConfig::new("INFY", dec!(500.00))],
        ..Default::default()
    };
    let bourse = Bourse::from_config(config).await.unwrap();
    create_router(Arc::new(AppState::new(Arc::new(bourse))))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_as(uri: &str, trader: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("X-Trader-Login", trader)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn decimal(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

// ============================================================================
// Public Endpoints
// ============================================================================

#[tokio::test]
async fn test_ping() {
    let app = create_test_app(dec!(100000.00)).await;
    let (status, json) = send(&app, get("/api/v1/ping")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({}));
}

// ============================================================================
// Order Submission
// ============================================================================

#[tokio::test]
async fn test_submit_market_buy_fills() {
    let app = create_test_app(dec!(100000.00)).await;

    let (status, json) = send(
        &app,
        post_as(
            "/api/v1/orders",
            "alice",
            json!({ "instrument": "INFY", "side": "BUY", "type": "MARKET", "quantity": "100" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["order"]["status"], "FILLED");
    assert_eq!(json["order"]["timeInForce"], "DAY");
    assert_eq!(decimal(&json["execution"]["price"]), dec!(500.00));
    assert_eq!(decimal(&json["execution"]["fee"]), dec!(25.00));
    assert_eq!(json["marginAssessment"]["scope"], "NSE_CASH");
    assert_eq!(
        decimal(&json["marginAssessment"]["initialRequirement"]),
        dec!(10000.00)
    );

    let (_, account) = send(&app, get("/api/v1/accounts/1")).await;
    assert_eq!(decimal(&account["balance"]), dec!(49975.00));
    assert_eq!(account["traderLogin"], "alice");
}

#[tokio::test]
async fn test_insufficient_margin_returns_assessment() {
    let app = create_test_app(dec!(5000.00)).await;

    let (status, json) = send(
        &app,
        post_as(
            "/api/v1/orders",
            "alice",
            json!({ "instrument": "INFY", "side": "BUY", "type": "MARKET", "quantity": "100" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "INSUFFICIENT_MARGIN");
    assert_eq!(json["assessment"]["sufficient"], false);
    assert_eq!(
        decimal(&json["assessment"]["remainingBalance"]),
        dec!(-5000.00)
    );

    let (_, orders) = send(&app, get("/api/v1/accounts/1/orders")).await;
    assert_eq!(orders.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_limit_not_met_is_a_rejected_order_not_an_error() {
    let app = create_test_app(dec!(100000.00)).await;

    let (status, json) = send(
        &app,
        post_as(
            "/api/v1/orders",
            "alice",
            json!({
                "instrument": "1",
                "side": "BUY",
                "type": "LIMIT",
                "quantity": "10",
                "limitPrice": "490.00"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["order"]["status"], "REJECTED");
    assert!(
        json["order"]["rejectionReason"]
            .as_str()
            .unwrap()
            .contains("limit not met")
    );
    assert!(json.get("execution").is_none());
}

#[tokio::test]
async fn test_validation_errors_map_to_bad_request() {
    let app = create_test_app(dec!(100000.00)).await;

    // Not a lot-size multiple
    let (status, json) = send(
        &app,
        post_as(
            "/api/v1/orders",
            "alice",
            json!({ "instrument": "INFY", "side": "BUY", "type": "MARKET", "quantity": "15" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION");

    // Unparseable side
    let (status, json) = send(
        &app,
        post_as(
            "/api/v1/orders",
            "alice",
            json!({ "instrument": "INFY", "side": "HOLD", "type": "MARKET", "quantity": "10" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["message"].as_str().unwrap().contains("side"));
}

#[tokio::test]
async fn test_missing_trader_header() {
    let app = create_test_app(dec!(100000.00)).await;

    let request = json_request(
        "POST",
        "/api/v1/orders",
        json!({ "instrument": "INFY", "side": "BUY", "type": "MARKET", "quantity": "10" }),
    );
    let (status, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION");
}

#[tokio::test]
async fn test_unknown_trader_and_instrument_are_not_found() {
    let app = create_test_app(dec!(100000.00)).await;

    let (status, json) = send(
        &app,
        post_as(
            "/api/v1/orders",
            "mallory",
            json!({ "instrument": "INFY", "side": "BUY", "type": "MARKET", "quantity": "10" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");

    let (status, _) = send(
        &app,
        post_as(
            "/api/v1/orders",
            "alice",
            json!({ "instrument": "WIPRO", "side": "BUY", "type": "MARKET", "quantity": "10" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_place_trading_order_sell_and_positions() {
    let app = create_test_app(dec!(100000.00)).await;

    let (status, json) = send(
        &app,
        post_as(
            "/api/v1/trading/orders",
            "alice",
            json!({ "instrumentId": 1, "side": "BUY", "type": "MARKET", "quantity": "100" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["status"], "FILLED");

    // Selling more than held never reaches settlement
    let (status, json) = send(
        &app,
        post_as(
            "/api/v1/trading/orders",
            "alice",
            json!({ "instrumentId": 1, "side": "SELL", "type": "MARKET", "quantity": "200" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION");

    let (status, positions) = send(&app, get("/api/v1/accounts/1/positions")).await;
    assert_eq!(status, StatusCode::OK);
    let positions = positions.as_array().unwrap();
    assert_eq!(positions.len(), 1);
    assert_eq!(decimal(&positions[0]["quantity"]), dec!(100));
    assert_eq!(decimal(&positions[0]["avgCost"]), dec!(500.00));
}

// ============================================================================
// Account Read Side
// ============================================================================

#[tokio::test]
async fn test_ledger_and_reconciliation() {
    let app = create_test_app(dec!(100000.00)).await;

    send(
        &app,
        post_as(
            "/api/v1/orders",
            "alice",
            json!({ "instrument": "INFY", "side": "BUY", "type": "MARKET", "quantity": "10" }),
        ),
    )
    .await;

    let (status, ledger) = send(&app, get("/api/v1/accounts/1/ledger")).await;
    assert_eq!(status, StatusCode::OK);
    let ledger = ledger.as_array().unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[0]["entryType"], "CREDIT");
    assert_eq!(ledger[1]["entryType"], "DEBIT");
    assert_eq!(decimal(&ledger[1]["amount"]), dec!(5025.00));
    assert!(ledger[1]["reference"].as_str().unwrap().starts_with("ORD-"));

    let (status, report) = send(&app, get("/api/v1/accounts/1/reconciliation")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["consistent"], true);
    assert_eq!(report["entryCount"], 2);
    assert!(report.get("error").is_none());
}

#[tokio::test]
async fn test_unknown_account_is_not_found() {
    let app = create_test_app(dec!(100000.00)).await;
    let (status, json) = send(&app, get("/api/v1/accounts/42")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

// ============================================================================
// Admin Endpoints
// ============================================================================

#[tokio::test]
async fn test_deposit() {
    let app = create_test_app(dec!(1000.00)).await;

    let (status, json) = send(
        &app,
        json_request(
            "POST",
            "/admin/accounts/1/deposit",
            json!({ "amount": "500.25", "description": "top up" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(decimal(&json["balanceAfter"]), dec!(1500.25));
    assert_eq!(json["description"], "top up");

    let (status, json) = send(
        &app,
        json_request("POST", "/admin/accounts/1/deposit", json!({ "amount": "-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION");
}

#[tokio::test]
async fn test_set_price_moves_fill_price() {
    let app = create_test_app(dec!(100000.00)).await;

    let (status, json) = send(
        &app,
        json_request("PUT", "/admin/prices/1", json!({ "price": "512.35" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["symbol"], "INFY");

    let (_, json) = send(
        &app,
        post_as(
            "/api/v1/orders",
            "alice",
            json!({ "instrument": "INFY", "side": "BUY", "type": "MARKET", "quantity": "10" }),
        ),
    )
    .await;
    assert_eq!(decimal(&json["execution"]["price"]), dec!(512.35));

    let (status, _) = send(
        &app,
        json_request("PUT", "/admin/prices/99", json!({ "price": "10.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
