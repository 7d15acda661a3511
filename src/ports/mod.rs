//! # Ports
//!
//! Trait contracts for the storage adapters.
//!
//! The tree never touches slots directly; it goes through `NodeStore`, so a
//! different arena can be plugged in via `NTree::with_store`.

use thiserror::Error;

use crate::core::{Node, NodeId};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a node store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store is full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },

    #[error("node {0} is not occupied")]
    Vacant(NodeId),
}

/// Value storage provider for tree nodes
///
/// Ids handed out by `allocate` stay stable until `free`; freeing never
/// renumbers other slots.
pub trait NodeStore<T> {
    /// Store a new node and return its id
    fn allocate(&mut self, value: T, parent: Option<NodeId>) -> StoreResult<NodeId>;

    /// Release a slot, returning the value it held
    ///
    /// Child links of the freed node are not followed.
    fn free(&mut self, id: NodeId) -> Option<T>;

    /// Whether `id` names a live node (generation included)
    fn is_occupied(&self, id: NodeId) -> bool;

    /// The live id stored at a raw slot index, if any
    fn id_at(&self, index: usize) -> Option<NodeId>;

    /// Borrow a live node
    fn node(&self, id: NodeId) -> Option<&Node<T>>;

    /// Mutably borrow a live node
    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<T>>;

    /// Number of live nodes
    fn len(&self) -> usize;

    /// Maximum number of live nodes
    fn capacity(&self) -> usize;

    /// Drop every node
    fn clear(&mut self);

    // ========================================================================
    // PROVIDED
    // ========================================================================

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    fn children<'a>(&'a self, id: NodeId) -> &'a [NodeId]
    where
        T: 'a,
    {
        self.node(id).map(|node| node.children()).unwrap_or(&[])
    }

    fn value(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|node| &node.value)
    }

    fn value_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).map(|node| &mut node.value)
    }

    /// Append `child` to `parent`'s child list
    fn push_child(&mut self, parent: NodeId, child: NodeId) -> StoreResult<()> {
        let node = self.node_mut(parent).ok_or(StoreError::Vacant(parent))?;
        node.children.push(child);
        Ok(())
    }

    /// Unlink `child` from `parent`'s child list
    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> StoreResult<()> {
        let node = self.node_mut(parent).ok_or(StoreError::Vacant(parent))?;
        node.children.retain(|&id| id != child);
        Ok(())
    }
}
