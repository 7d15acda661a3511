//! # Core
//!
//! Pure data types. No storage, no traversal logic.
//!
//! Contains:
//! - `NodeId` - generational slot handle
//! - `Position` - cursor location including the two sentinels
//! - `Direction` - forward / backward stepping
//! - `TraversalOrder` - the closed set of supported orders
//! - `Node` - one stored tree element
//! - `TreeConfig`, `FailurePolicy` - configuration

pub mod config;
pub mod node;
pub mod policy;

pub use config::TreeConfig;
pub use node::Node;
pub use policy::FailurePolicy;

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Handle to a node slot
///
/// The generation is bumped every time the slot is freed, so a handle taken
/// before a removal never matches whatever is stored in the slot afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    pub fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index in `0..capacity`
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Where a cursor currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// One step before the first node of the order
    BeforeFirst,
    /// On a node (which may have been removed since)
    At(NodeId),
    /// One step after the last node of the order
    AfterLast,
}

impl Position {
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Position::At(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Position::At(_))
    }
}

/// Stepping direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn reverse(&self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    /// The sentinel a cursor lands on when it runs out of nodes
    pub fn end(&self) -> Position {
        match self {
            Direction::Forward => Position::AfterLast,
            Direction::Backward => Position::BeforeFirst,
        }
    }
}

/// Traversal order a cursor is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TraversalOrder {
    /// Node before its descendants, children in insertion order
    #[default]
    PreOrder,
    /// Node after its descendants, children in insertion order
    PostOrder,
    /// Level by level, left to right
    BreadthFirst,
}

impl TraversalOrder {
    pub const ALL: [TraversalOrder; 3] = [
        TraversalOrder::PreOrder,
        TraversalOrder::PostOrder,
        TraversalOrder::BreadthFirst,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TraversalOrder::PreOrder => "pre-order",
            TraversalOrder::PostOrder => "post-order",
            TraversalOrder::BreadthFirst => "breadth-first",
        }
    }
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
