//! # Errors
//!
//! Every precondition class the tree and its cursors can report.

use thiserror::Error;

use crate::core::{Direction, NodeId};
use crate::ports::StoreError;

/// Result type for tree and cursor operations
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors returned by tree and cursor operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("index {index} out of range for capacity {capacity}")]
    IndexOutOfRange { index: usize, capacity: usize },

    #[error("iterator does not address a live node")]
    InvalidIterator,

    #[error("cannot step {0:?} past the end sentinel")]
    StepPastEnd(Direction),

    #[error("iterator is on a sentinel and cannot be dereferenced")]
    NotDereferenceable,

    #[error("iterators belong to different trees")]
    TreeMismatch,

    #[error("tree is empty")]
    EmptyTree,

    #[error("node {0} has no children")]
    NoChildren(NodeId),

    #[error("node {0} is the root and has no parent")]
    NoParent(NodeId),

    #[error("node {node} already has the maximum of {max} children")]
    TooManyChildren { node: NodeId, max: usize },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("tree is already borrowed by an in-progress access")]
    Busy,
}

impl TreeError {
    /// True for caller mistakes, false for re-entrant access
    pub fn is_precondition(&self) -> bool {
        !matches!(self, TreeError::Busy)
    }
}
