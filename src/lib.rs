//! # ntree - Arena-backed N-ary Tree
//!
//! An N-ary tree whose nodes live in a fixed-capacity arena, walked by
//! bidirectional cursors in pre-order, post-order or breadth-first order.
//!
//! ## Philosophy
//!
//! - **Cursors borrow, the tree decides** - validity is checked against the
//!   tree on every use, so removal invalidates cursors immediately
//! - **Sentinels on both ends** - `BeforeFirst` and `AfterLast` make every
//!   step reversible
//! - **Configurable strictness** - precondition violations either return an
//!   error or degrade to a well-defined no-op, per tree
//! - **Pure core, swappable adapters** - hexagonal architecture
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         NTREE                                │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  CORE (pure types, no I/O)                                   │
//! │    NodeId, Position, Direction, TraversalOrder, Node,        │
//! │    FailurePolicy, TreeConfig                                 │
//! │                                                              │
//! │  PORTS (trait contracts)                                     │
//! │    NodeStore                                                 │
//! │                                                              │
//! │  ADAPTERS (swappable implementations)                        │
//! │    Storage: ArenaStore                                       │
//! │                                                              │
//! │  ENGINE (orchestration)                                      │
//! │    NTree, ConstNTreeIterator, NTreeIterator, Traverse        │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use ntree::{NTree, TraversalOrder};
//!
//! let tree = NTree::new(3, 16);
//! tree.set_root_value('A').unwrap();
//!
//! let root = tree.root(TraversalOrder::PostOrder).unwrap();
//! let b = root.add_child('B').unwrap();
//! b.add_child('C').unwrap();
//!
//! let mut it = root;
//! it.move_first();
//! assert_eq!(it.get().unwrap(), 'C');
//! it.move_next().unwrap();
//! assert_eq!(it.get().unwrap(), 'B');
//!
//! let order: String = tree.values(TraversalOrder::PreOrder).collect();
//! assert_eq!(order, "ABC");
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Core domain - plain types, no storage
/// Contains: NodeId, Position, Direction, TraversalOrder, Node, policy, config
pub mod core;

/// Port definitions - trait contracts for adapters
/// Contains: NodeStore trait, StoreError
pub mod ports;

/// Adapter implementations - swappable components
/// Contains: storage submodule
pub mod adapters;

/// Engine - orchestration layer
/// Contains: NTree and its cursors
pub mod engine;

/// Error types shared by the tree and its cursors
pub mod error;

// ============================================================================
// RE-EXPORTS (public API)
// ============================================================================

// Core types
pub use crate::core::{Direction, NodeId, Position, TraversalOrder};
pub use crate::core::{FailurePolicy, Node, TreeConfig};

// Port traits
pub use crate::ports::{NodeStore, StoreError, StoreResult};

// Adapters
pub use crate::adapters::storage::ArenaStore;

// Engine
pub use crate::engine::{ConstNTreeIterator, NTree, NTreeIterator, Traverse};

// Errors
pub use crate::error::{TreeError, TreeResult};
