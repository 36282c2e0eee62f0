//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::census::CensusConfig;
use crate::ingest::RowPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub census: CensusSettings,

    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Input file configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Incident CSV file
    #[serde(default = "default_records_path")]
    pub records_path: PathBuf,

    /// Census cache JSON file
    #[serde(default = "default_census_cache")]
    pub census_cache: PathBuf,

    /// What to do with rows that fail validation
    #[serde(default)]
    pub row_policy: RowPolicy,
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("hal-atlas"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

fn default_records_path() -> PathBuf {
    PathBuf::from("data/HAL_cleaned.csv")
}

fn default_census_cache() -> PathBuf {
    default_data_dir().join("census_cache.json")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            records_path: default_records_path(),
            census_cache: default_census_cache(),
            row_policy: RowPolicy::default(),
        }
    }
}

/// Census API settings
#[derive(Debug, Clone, Deserialize)]
pub struct CensusSettings {
    #[serde(default = "default_census_url")]
    pub base_url: String,

    #[serde(default = "default_census_year")]
    pub year: u16,

    #[serde(default = "default_census_dataset")]
    pub dataset: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_census_url() -> String {
    CensusConfig::default().base_url
}

fn default_census_year() -> u16 {
    CensusConfig::default().year
}

fn default_census_dataset() -> String {
    CensusConfig::default().dataset
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for CensusSettings {
    fn default() -> Self {
        Self {
            base_url: default_census_url(),
            year: default_census_year(),
            dataset: default_census_dataset(),
            api_key: None,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl CensusSettings {
    /// Client configuration for these settings
    pub fn client_config(&self) -> CensusConfig {
        CensusConfig {
            base_url: self.base_url.clone(),
            year: self.year,
            dataset: self.dataset.clone(),
            api_key: self.api_key.clone(),
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

/// API server settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_max_page_size() -> usize {
    1000
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("hal-atlas").join("config.toml")),
            Some(PathBuf::from("/etc/hal-atlas/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Data overrides
        if let Some(path) = var("HAL_ATLAS_RECORDS") {
            self.data.records_path = PathBuf::from(path);
        }
        if let Some(path) = var("HAL_ATLAS_CENSUS_CACHE") {
            self.data.census_cache = PathBuf::from(path);
        }
        if let Some(policy) = var("HAL_ATLAS_ROW_POLICY") {
            match policy.parse() {
                Ok(p) => self.data.row_policy = p,
                Err(e) => tracing::warn!("Ignoring HAL_ATLAS_ROW_POLICY: {}", e),
            }
        }

        // Census overrides
        if let Some(key) = var("HAL_ATLAS_CENSUS_KEY") {
            self.census.api_key = Some(key);
        }
        if let Some(year) = var("HAL_ATLAS_CENSUS_YEAR") {
            if let Ok(y) = year.parse() {
                self.census.year = y;
            }
        }

        // API overrides
        if let Some(host) = var("HAL_ATLAS_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("HAL_ATLAS_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Logging overrides
        if let Some(level) = var("HAL_ATLAS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("HAL_ATLAS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# hal-atlas configuration
#
# Environment variables override these settings:
# - HAL_ATLAS_RECORDS
# - HAL_ATLAS_CENSUS_CACHE
# - HAL_ATLAS_ROW_POLICY
# - HAL_ATLAS_CENSUS_KEY
# - HAL_ATLAS_CENSUS_YEAR
# - HAL_ATLAS_API_HOST
# - HAL_ATLAS_API_PORT
# - HAL_ATLAS_LOG_LEVEL
# - HAL_ATLAS_LOG_FORMAT

[data]
# Incident CSV (state,year,month,day,victim,county,race,sex,offense)
records_path = "data/HAL_cleaned.csv"

# Census statistics cache written by `hal-atlas census fetch`
census_cache = "data/census_cache.json"

# Invalid rows: "skip" (log and continue) or "abort" (stop loading)
row_policy = "skip"

[census]
# Census Bureau API
base_url = "https://api.census.gov/data"
year = 2020
dataset = "acs/acs5"

# Optional API key
# api_key = ""

# Request timeout in milliseconds
request_timeout_ms = 30000

[api]
# API server host
host = "127.0.0.1"

# API server port
port = 8090

# Allowed CORS origins (empty = any origin)
cors_origins = []

# Maximum records returned by one request
max_page_size = 1000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
