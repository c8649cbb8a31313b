//! Error types for report validation.

use thiserror::Error;

/// Errors raised while validating report payloads.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReportError {
    #[error("Report title must not be empty")]
    EmptyTitle,

    #[error("Report type must not be empty")]
    EmptyType,

    /// The file format is not one the report store accepts.
    #[error("Unsupported report format: {0}")]
    UnsupportedFormat(String),
}
