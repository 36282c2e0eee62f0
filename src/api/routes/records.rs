//! Record Routes
//!
//! - GET /api/v1/attributes - Filterable attribute names
//! - GET /api/v1/records?attribute=&value=&limit= - Filter records
//! - GET /api/v1/records/timeline?from=&to=&limit= - Records in date order

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{AttributesResponse, RecordQuery, TimelineQuery, TimelineResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::record::Attribute;
use crate::view::{self, FilteredView};

/// GET /api/v1/attributes
pub async fn list_attributes() -> Json<AttributesResponse> {
    Json(AttributesResponse {
        attributes: Attribute::all().iter().map(Attribute::as_str).collect(),
    })
}

/// GET /api/v1/records
///
/// Both `attribute` and `value` are required. An unknown attribute name is
/// rejected with 400.
pub async fn filter_records(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecordQuery>,
) -> ApiResult<Json<FilteredView>> {
    let attribute = query
        .attribute
        .ok_or_else(|| ApiError::Validation("attribute is required".to_string()))?;
    let value = query
        .value
        .ok_or_else(|| ApiError::Validation("value is required".to_string()))?;

    let limit = state.page_size(query.limit);
    let view = view::filtered(&state.index, &attribute, &value, Some(limit))?;

    tracing::debug!(
        attribute = %attribute,
        value = %value,
        total = view.total,
        "Filtered records"
    );

    Ok(Json(view))
}

/// GET /api/v1/records/timeline
pub async fn timeline(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TimelineQuery>,
) -> ApiResult<Json<TimelineResponse>> {
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err(ApiError::Validation(
                "from must not be after to".to_string(),
            ));
        }
    }

    let limit = state.page_size(query.limit);
    let from = query.from.unwrap_or(chrono::NaiveDate::MIN);
    let to = query.to.unwrap_or(chrono::NaiveDate::MAX);

    let mut total = 0;
    let mut records = Vec::new();
    for record in state.index.between(from, to) {
        if records.len() < limit {
            records.push(record.clone());
        }
        total += 1;
    }

    Ok(Json(TimelineResponse { total, records }))
}
