//! Application State
//!
//! Shared state accessible by all API handlers. The record index is fully
//! built before the server starts and is only read afterwards, so it is
//! shared through a plain `Arc` without locking.

use crate::census::Demographics;
use crate::config::ApiSettings;
use crate::index::RecordIndex;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded incident records
    pub index: Arc<RecordIndex>,
    /// County statistics (may be empty)
    pub demographics: Arc<Demographics>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState from a loaded index
    pub fn new(index: RecordIndex, demographics: Demographics, config: ApiConfig) -> Self {
        Self {
            index: Arc::new(index),
            demographics: Arc::new(demographics),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Clamp a requested page size to the configured maximum
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.config.max_page_size)
            .min(self.config.max_page_size)
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Allowed CORS origins (empty = any)
    pub cors_origins: Vec<String>,
    /// Maximum records returned by one request
    pub max_page_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiSettings::default().into()
    }
}

impl From<ApiSettings> for ApiConfig {
    fn from(settings: ApiSettings) -> Self {
        Self {
            host: settings.host,
            port: settings.port,
            cors_origins: settings.cors_origins,
            max_page_size: settings.max_page_size,
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
