//! Liveness and slot counters
//!
//! `/health` answers without touching the database, so a load balancer can
//! poll it before the first slot request opens the store. `/metrics` returns
//! the slot create, update, and delete counters together with the rejection
//! counters recorded by `AppState::observe`.

use std::sync::Arc;

use axum::extract::State;
use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use super::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Crate version of the running committee API
    pub version: &'static str,
}

impl HealthResponse {
    fn current() -> Self {
        Self {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// `/health` and `/metrics`, nested under `/observability`
pub fn observability_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Stateless `/health` mounted at the root
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse::current()))
}

async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.metrics.snapshot()))
}
