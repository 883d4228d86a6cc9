//! Route definitions for the DeviceGate HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(device_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(request_logging))
        .with_state(state)
}

/// Device session endpoints (bearer token required)
fn device_routes() -> Router<AppState> {
    Router::new()
        .route("/devices", get(handlers::devices::list_devices))
        .route("/devices/admit", post(handlers::devices::admit))
        .route("/devices/logout", post(handlers::devices::logout))
        .route("/devices/logout-others", post(handlers::devices::logout_others))
        .route("/devices/notice", get(handlers::devices::take_notice))
}

/// Health check endpoint (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
