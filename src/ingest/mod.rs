//! Record Sources
//!
//! Loads incident records from external files:
//! - CSV import (incident table with one row per event)
//!
//! A source decides what happens to a row that cannot become a `Record`:
//! skip it and keep going, or abort the whole load.

mod csv_import;

pub use csv_import::{load_index, CsvImportResult, CsvImporter, HEADER};

use crate::record::RecordError;
use serde::Deserialize;

/// What to do with a row that fails validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPolicy {
    /// Count and describe the row, continue with the next one
    #[default]
    Skip,
    /// Stop the import with the row's error
    Abort,
}

impl std::str::FromStr for RowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(RowPolicy::Skip),
            "abort" => Ok(RowPolicy::Abort),
            other => Err(format!("unknown row policy: {}", other)),
        }
    }
}

/// Errors that can occur while loading records
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: RecordError,
    },
}
