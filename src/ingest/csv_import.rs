//! CSV Import
//!
//! Reads the incident table (`state,year,month,day,victim,county,race,sex,offense`)
//! into validated records. Columns are matched by header name, so column
//! order does not matter and unknown columns are ignored. A UTF-8 byte order
//! mark at the start of the file is tolerated.

use super::{IngestError, RowPolicy};
use crate::index::RecordIndex;
use crate::record::{RawRecord, Record};
use std::io::Read;
use std::path::Path;

/// Expected header row of the incident table
pub const HEADER: &str = "state,year,month,day,victim,county,race,sex,offense";

/// Keep at most this many row errors in a result
const MAX_ERRORS: usize = 100;

/// CSV importer for incident records
#[derive(Debug, Clone, Default)]
pub struct CsvImporter {
    policy: RowPolicy,
}

/// Result of a CSV import operation
#[derive(Debug, Default)]
pub struct CsvImportResult {
    pub records: Vec<Record>,
    pub rows_processed: usize,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

impl CsvImportResult {
    /// Build an index from the imported records, in file order
    pub fn into_index(self) -> RecordIndex {
        RecordIndex::load(self.records)
    }
}

impl CsvImporter {
    /// Create an importer that skips invalid rows
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy for invalid rows
    pub fn with_policy(mut self, policy: RowPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RowPolicy {
        self.policy
    }

    /// Import records from a CSV file
    pub fn import(&self, path: &Path) -> Result<CsvImportResult, IngestError> {
        let file = std::fs::File::open(path)?;
        tracing::info!("Importing incident records from {:?}", path);
        self.import_reader(file)
    }

    /// Import from a CSV string (useful for testing)
    pub fn import_str(&self, csv_data: &str) -> Result<CsvImportResult, IngestError> {
        self.import_reader(csv_data.as_bytes())
    }

    /// Import from any reader
    pub fn import_reader<R: Read>(&self, reader: R) -> Result<CsvImportResult, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut result = CsvImportResult::default();

        for (line_num, row) in reader.deserialize::<RawRecord>().enumerate() {
            // Header is line 1
            let line = line_num + 2;

            let raw = match row {
                Ok(raw) => raw,
                Err(e) => {
                    if self.policy == RowPolicy::Abort {
                        return Err(IngestError::Csv(e));
                    }
                    tracing::warn!("Skipping line {}: {}", line, e);
                    result.errors.push(format!("Line {}: {}", line, e));
                    result.rows_failed += 1;
                    continue;
                }
            };

            match Record::try_from(raw) {
                Ok(record) => {
                    result.records.push(record);
                    result.rows_processed += 1;
                }
                Err(source) => {
                    if self.policy == RowPolicy::Abort {
                        return Err(IngestError::Record { line, source });
                    }
                    tracing::warn!("Skipping line {}: {}", line, source);
                    result.errors.push(format!("Line {}: {}", line, source));
                    result.rows_failed += 1;
                }
            }
        }

        // Truncate errors if too many
        if result.errors.len() > MAX_ERRORS {
            let total = result.errors.len();
            result.errors.truncate(MAX_ERRORS);
            result.errors.push(format!("... and {} more errors", total - MAX_ERRORS));
        }

        tracing::info!(
            rows_processed = result.rows_processed,
            rows_failed = result.rows_failed,
            "CSV import finished"
        );

        Ok(result)
    }
}

/// Import a CSV file and build an index from it
///
/// Returns the index together with the import result (with its records
/// already moved into the index).
pub fn load_index(
    path: &Path,
    policy: RowPolicy,
) -> Result<(RecordIndex, CsvImportResult), IngestError> {
    let mut result = CsvImporter::new().with_policy(policy).import(path)?;
    let index = RecordIndex::load(std::mem::take(&mut result.records));

    tracing::info!("Loaded record index: {}", index.stats());
    Ok((index, result))
}
