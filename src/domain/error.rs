//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeId;

/// Domain errors represent violations of the tree's structural rules.
///
/// Layout never produces these: a layout pass always completes and reports
/// inconsistencies as warnings instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("no node at path: {path}")]
    PathNotFound { path: String },

    #[error("node does not exist in this tree: {0:?}")]
    InvalidNode(NodeId),

    #[error("invalid weight {weight}: weights must be finite and >= 0")]
    InvalidWeight { weight: f64 },
}

/// Result type for tree operations.
pub type DomainResult<T> = Result<T, DomainError>;
