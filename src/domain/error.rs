//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of decision tree invariants.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("tree has no root node")]
    MissingRoot,

    #[error("duplicate node id: {0}")]
    DuplicateNodeId(String),

    #[error("tree is deeper than the limit of {limit} levels")]
    DepthExceeded { limit: usize },

    #[error("example not found: {0}")]
    ExampleNotFound(String),

    #[error("invalid {kind} document: {message}")]
    InvalidDocument { kind: String, message: String },
}
