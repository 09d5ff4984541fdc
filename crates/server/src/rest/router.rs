use axum::{
    Router,
    routing::{get, post, put},
};
use bourse_settlement::Bourse;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{admin_handlers, handlers};

/// Application state shared across handlers
pub struct AppState {
    pub bourse: Arc<Bourse>,
}

impl AppState {
    pub fn new(bourse: Arc<Bourse>) -> Self {
        AppState { bourse }
    }
}

/// Create the REST API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/ping", get(handlers::ping))
        // Trading endpoints
        .route("/api/v1/orders", post(handlers::submit_order))
        .route("/api/v1/trading/orders", post(handlers::place_trading_order))
        // Account read side
        .route("/api/v1/accounts/{account_id}", get(handlers::get_account))
        .route(
            "/api/v1/accounts/{account_id}/positions",
            get(handlers::get_positions),
        )
        .route(
            "/api/v1/accounts/{account_id}/ledger",
            get(handlers::get_ledger),
        )
        .route(
            "/api/v1/accounts/{account_id}/orders",
            get(handlers::get_orders),
        )
        .route(
            "/api/v1/accounts/{account_id}/reconciliation",
            get(handlers::get_reconciliation),
        )
        // Admin/Bootstrap endpoints
        .route(
            "/admin/accounts/{account_id}/deposit",
            post(admin_handlers::deposit),
        )
        .route(
            "/admin/prices/{instrument_id}",
            put(admin_handlers::set_price),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
