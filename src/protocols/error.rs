//! Error types for protocol validation.

use thiserror::Error;

/// Errors raised while validating protocol payloads.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProtocolError {
    /// The protocol title is empty or whitespace.
    #[error("Protocol title must not be empty")]
    EmptyTitle,

    /// The protocol category is empty or whitespace.
    #[error("Protocol category must not be empty")]
    EmptyCategory,

    /// A protocol step is blank.
    #[error("Protocol step {0} is blank")]
    BlankStep(usize),
}
