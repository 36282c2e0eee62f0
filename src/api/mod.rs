//! hal-atlas REST API
//!
//! Read-only HTTP API over a loaded record index, built with Axum.
//!
//! # Endpoints
//!
//! ## Records
//! - `GET /api/v1/attributes` - Filterable attribute names
//! - `GET /api/v1/records?attribute=state&value=AL` - Filter records
//! - `GET /api/v1/records/timeline?from=1900-01-01&to=1910-12-31` - Date order
//!
//! ## Locations
//! - `GET /api/v1/locations` - Counts by state and county
//! - `GET /api/v1/locations/summary?state=AL` - Counts with county statistics
//! - `GET /api/v1/stats` - Index statistics
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use hal_atlas::api::{serve, ApiConfig, AppState};
//! use hal_atlas::census::Demographics;
//! use hal_atlas::ingest::{load_index, RowPolicy};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (index, _) = load_index("data/HAL_cleaned.csv".as_ref(), RowPolicy::Skip)?;
//!     let config = ApiConfig::default();
//!
//!     let state = AppState::new(index, Demographics::new(), config.clone());
//!     serve(state, &config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{http::HeaderValue, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Record routes
        .route("/attributes", get(routes::records::list_attributes))
        .route("/records", get(routes::records::filter_records))
        .route("/records/timeline", get(routes::records::timeline))
        // Location routes
        .route("/locations", get(routes::locations::location_counts))
        .route("/locations/summary", get(routes::locations::location_summary))
        .route("/stats", get(routes::locations::stats));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Permissive CORS unless specific origins are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new().allow_origin(AllowOrigin::list(origins))
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("hal-atlas API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("hal-atlas API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::census::{CountyStats, Demographics};
    use crate::index::RecordIndex;
    use crate::record::Record;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::NaiveDate;
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let index = RecordIndex::load(vec![
            Record::with_date("AL", date(1921, 3, 1)).county("Jefferson").race("Black"),
            Record::with_date("AL", date(1919, 7, 4)).county("Jefferson").race("Black"),
            Record::with_date("GA", date(1921, 3, 1)).county("Fulton").race("White"),
        ]);
        let demographics: Demographics = vec![CountyStats::new("AL", "Jefferson County", 100_000)]
            .into_iter()
            .collect();

        build_router(AppState::new(index, demographics, ApiConfig::default()))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn test_health_live() {
        let (status, _) = get_json(create_test_app(), "/health/live").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (status, body) = get_json(create_test_app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["records"], 3);
    }

    #[tokio::test]
    async fn test_list_attributes() {
        let (status, body) = get_json(create_test_app(), "/api/v1/attributes").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["attributes"].as_array().unwrap().len(), 7);
        assert_eq!(body["attributes"][0], "state");
    }

    #[tokio::test]
    async fn test_filter_records() {
        let (status, body) =
            get_json(create_test_app(), "/api/v1/records?attribute=state&value=AL").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["attribute"], "state");
        assert_eq!(body["total"], 2);
        assert_eq!(body["records"][0]["date"], "1919-07-04");
        assert_eq!(body["records"][1]["county"], "Jefferson");
    }

    #[tokio::test]
    async fn test_filter_limit() {
        let (status, body) = get_json(
            create_test_app(),
            "/api/v1/records?attribute=victimRace&value=Black&limit=1",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["records"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_filter_unknown_attribute() {
        let (status, body) = get_json(
            create_test_app(),
            "/api/v1/records?attribute=nonexistentField&value=x",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "UNKNOWN_ATTRIBUTE");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_filter_missing_value() {
        let (status, body) = get_json(create_test_app(), "/api/v1/records?attribute=state").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_timeline() {
        let (status, body) = get_json(
            create_test_app(),
            "/api/v1/records/timeline?from=1920-01-01&to=1921-12-31",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["records"][0]["state"], "AL");
        assert_eq!(body["records"][1]["state"], "GA");

        let (status, _) = get_json(
            create_test_app(),
            "/api/v1/records/timeline?from=1930-01-01&to=1921-12-31",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_location_counts() {
        let (status, body) = get_json(create_test_app(), "/api/v1/locations").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["AL"]["Jefferson"], 2);
        assert_eq!(body["GA"]["Fulton"], 1);
    }

    #[tokio::test]
    async fn test_location_summary() {
        let (status, body) =
            get_json(create_test_app(), "/api/v1/locations/summary?state=Alabama").await;

        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["incidents"], 2);
        assert_eq!(rows[0]["stats"]["population"], 100_000);
        assert_eq!(rows[0]["incidentsPer100k"], 2.0);

        let (status, _) =
            get_json(create_test_app(), "/api/v1/locations/summary?state=Atlantis").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stats() {
        let (status, body) = get_json(create_test_app(), "/api/v1/stats").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["records"], 3);
        assert_eq!(body["states"], 2);
        assert_eq!(body["countiesWithStats"], 1);
        assert_eq!(body["earliest"], "1919-07-04");
    }
}
