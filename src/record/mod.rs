//! Incident records
//!
//! A record is one normalized incident: where and when it happened, and what
//! is known about the victim. Records are immutable after construction.

mod error;
mod types;

pub use error::{RecordError, RecordResult};
pub use types::{Attribute, RawRecord, Record, DATE_FORMAT};
