//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use crate::index::IndexStats;
use crate::record::Record;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================
// RECORD DTOs
// ============================================

/// Query string for `GET /api/v1/records`
#[derive(Debug, Deserialize)]
pub struct RecordQuery {
    /// Attribute name (e.g., "state", "victimRace")
    pub attribute: Option<String>,
    /// Value to match exactly
    pub value: Option<String>,
    /// Maximum records to return
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Query string for `GET /api/v1/records/timeline`
#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    /// Inclusive start date (YYYY-MM-DD)
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Inclusive end date (YYYY-MM-DD)
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Records in date order
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineResponse {
    /// Matching records before the limit was applied
    pub total: usize,
    pub records: Vec<Record>,
}

/// Filterable attribute names
#[derive(Debug, Serialize)]
pub struct AttributesResponse {
    pub attributes: Vec<&'static str>,
}

// ============================================
// LOCATION DTOs
// ============================================

/// Query string for `GET /api/v1/locations/summary`
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    #[serde(default)]
    pub state: Option<String>,
}

// ============================================
// STATS / HEALTH DTOs
// ============================================

/// Index and demographic statistics
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub index: IndexStats,
    /// Counties with demographic data
    pub counties_with_stats: usize,
}

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub records: usize,
    pub demographics: String,
    pub uptime_seconds: u64,
    pub version: String,
}
