//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::arena::NodeId;

/// Domain errors represent violations of the component contract.
/// These are independent of configuration and terminal concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unsupported operation: {operation} on leaf {node}")]
    UnsupportedOperation {
        operation: &'static str,
        node: NodeId,
    },

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("cycle detected: {parent} is reachable from {child}")]
    CycleDetected { parent: NodeId, child: NodeId },

    #[error("node {node} is still referenced by {owners} composite(s)")]
    StillReferenced { node: NodeId, owners: usize },

    #[error("parse error at position {position}: {message}")]
    Parse { position: usize, message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
