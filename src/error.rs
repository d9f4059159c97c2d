//! Error types for record loading and parsing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or constructing test records.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The records file could not be read.
    #[error("failed to read records from {path}: {source}")]
    ReadRecords {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The records file is not a JSON array of test results.
    #[error("failed to parse records in {path}: {source}")]
    ParseRecords {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A `--add` value did not have the `INSTRUMENT,STATUS[,DATE]` shape.
    #[error("invalid test result '{0}', expected INSTRUMENT,STATUS[,DATE]")]
    InvalidResultSpec(String),

    /// Status was not one of passed, failed, pending.
    #[error("unknown test status '{0}', expected passed, failed or pending")]
    UnknownStatus(String),

    /// An explicitly supplied date could not be parsed.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}
