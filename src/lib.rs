//! # hal-atlas
//!
//! Indexes historical lynching incident records by date and serves filtered
//! views of them, joined with county-level census statistics.
//!
//! ## Modules
//!
//! - [`record`]: Incident records and their normalization
//! - [`index`]: Date-ordered record index with filtering and location counts
//! - [`ingest`]: CSV record source
//! - [`census`]: County statistics from the Census API or a JSON cache
//! - [`view`]: Display views combining records and statistics
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust
//! use hal_atlas::{Record, RecordIndex};
//!
//! let index = RecordIndex::load(vec![
//!     Record::new("AL", Some("1921"), Some("3"), Some("1")).unwrap().county("Jefferson"),
//!     Record::new("AL", Some("1919"), Some("7"), Some("4")).unwrap().county("Jefferson"),
//!     Record::new("GA", Some("1921"), Some("3"), Some("1")).unwrap().county("Fulton"),
//! ]);
//!
//! let alabama: Vec<_> = index.filter("state", "AL").unwrap().collect();
//! assert_eq!(alabama.len(), 2);
//! assert_eq!(index.location_counts().get("AL", "Jefferson"), 2);
//! ```

pub mod api;
pub mod census;
pub mod config;
pub mod index;
pub mod ingest;
pub mod record;
pub mod view;

// Re-export top-level types for convenience
pub use record::{Attribute, RawRecord, Record, RecordError, RecordResult};

pub use index::{IndexStats, LocationCounts, RecordIndex};

pub use ingest::{load_index, CsvImportResult, CsvImporter, IngestError, RowPolicy};

pub use census::{
    CensusCache, CensusClient, CensusConfig, CensusError, CountyStats, DemographicSource,
    Demographics,
};

pub use view::{FilteredView, LocationSummary};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig};
