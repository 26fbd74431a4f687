//! HTTP interface layer: routing, handlers and flash messaging.

pub mod flash;
pub mod rest;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(rest::show_form).post(rest::submit))
        .route("/health", get(rest::health))
        .route("/debug/config", get(rest::debug_config))
        .route("/debug/webhook-test", post(rest::debug_webhook_test))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
