//! # Engine
//!
//! The orchestration layer that wires everything together.
//!
//! This is where:
//! - Configuration is applied
//! - The arena adapter is connected to the `NodeStore` port
//! - Traversal orders are turned into cursors

mod display;
mod iter;
mod traversal;
mod tree;

pub use iter::{ConstNTreeIterator, NTreeIterator, Traverse};
pub use tree::NTree;
