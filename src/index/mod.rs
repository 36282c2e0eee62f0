//! Record Index Structures
//!
//! - **RecordIndex**: binary search tree over incident dates, with lazy
//!   attribute filtering and in-order (date) traversal
//! - **LocationCounts**: state → county → count table, updated on insert
//!
//! # Data flow
//!
//! ```text
//! Record source: rows → Record
//!        ↓
//! RecordIndex::insert ─┬→ tree (ordered by date, ties go right)
//!                      └→ LocationCounts (+1 for the record's own location)
//!        ↓
//! filter(attribute, value) → matching records
//! location_counts()       → aggregation table
//! ```

mod locations;
mod tree;

pub use locations::{LocationCounts, UNKNOWN_COUNTY};
pub use tree::{Filter, Iter, PreOrder, RecordIndex};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Statistics about a loaded index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    /// Number of records inserted
    pub records: usize,
    /// Longest root-to-leaf path
    pub depth: usize,
    /// Number of distinct states
    pub states: usize,
    /// Number of distinct (state, county) pairs
    pub locations: usize,
    /// Earliest incident date
    pub earliest: Option<NaiveDate>,
    /// Latest incident date
    pub latest: Option<NaiveDate>,
}

impl std::fmt::Display for IndexStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} records, {} states, {} locations, depth {}",
            self.records, self.states, self.locations, self.depth
        )?;
        if let (Some(earliest), Some(latest)) = (self.earliest, self.latest) {
            write!(f, ", {} to {}", earliest, latest)?;
        }
        Ok(())
    }
}
