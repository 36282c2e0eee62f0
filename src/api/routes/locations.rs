//! Location Routes
//!
//! - GET /api/v1/locations - Incident counts by state and county
//! - GET /api/v1/locations/summary?state= - Counts joined with county statistics
//! - GET /api/v1/stats - Index statistics

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{StatsResponse, SummaryQuery};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::index::LocationCounts;
use crate::view::{self, LocationSummary};

/// GET /api/v1/locations
pub async fn location_counts(State(state): State<Arc<AppState>>) -> Json<LocationCounts> {
    Json(state.index.location_counts().clone())
}

/// GET /api/v1/locations/summary
pub async fn location_summary(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<Vec<LocationSummary>>> {
    let wanted = query.state.as_deref();
    let summaries = view::location_summaries(&state.index, &state.demographics, wanted)
        .ok_or_else(|| ApiError::NotFound(format!("state {}", wanted.unwrap_or_default())))?;

    Ok(Json(summaries))
}

/// GET /api/v1/stats
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        index: state.index.stats(),
        counties_with_stats: state.demographics.len(),
    })
}
