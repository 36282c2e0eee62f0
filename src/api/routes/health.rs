//! Health Routes
//!
//! - GET /health/live - process is up
//! - GET /health/ready - index loaded, safe to route traffic
//! - GET /health - record count, demographic coverage, uptime

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// The index is built before the listener binds, so any process that
/// answers is ready.
pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
///
/// Reports "degraded" when no county statistics are loaded: record queries
/// still work but location summaries carry no statistics.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (status, demographics) = match state.demographics.len() {
        0 => ("degraded", "missing"),
        _ => ("healthy", "ok"),
    };

    Json(HealthResponse {
        status: status.to_string(),
        records: state.index.len(),
        demographics: demographics.to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
