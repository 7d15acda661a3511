//! # NTree
//!
//! The tree container.
//!
//! This struct owns:
//! - Storage (NodeStore port)
//! - The root designation
//! - Configuration (limits and failure policy)
//!
//! And hands out cursors bound to a traversal order. Storage sits behind a
//! `RefCell` so cursors can share the tree while edits stay possible; every
//! edit is visible to every cursor on its next use.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;

use log::debug;

use super::iter::{ConstNTreeIterator, NTreeIterator, Traverse};
use super::traversal::Walker;
use crate::adapters::storage::ArenaStore;
use crate::core::{FailurePolicy, NodeId, Position, TraversalOrder, TreeConfig};
use crate::error::{TreeError, TreeResult};
use crate::ports::NodeStore;

/// Arena-backed N-ary tree
pub struct NTree<T> {
    /// Configuration
    config: TreeConfig,

    /// Storage backend (NodeStore port)
    store: RefCell<Box<dyn NodeStore<T>>>,

    /// Root node, `None` while empty
    root: Cell<Option<NodeId>>,
}

impl<T: 'static> NTree<T> {
    /// Create an empty tree with the `Raise` policy
    pub fn new(max_children: usize, capacity: usize) -> Self {
        Self::with_config(TreeConfig::new(max_children, capacity))
    }

    /// Create an empty tree backed by an `ArenaStore`
    pub fn with_config(config: TreeConfig) -> Self {
        let store = Box::new(ArenaStore::with_capacity(config.capacity));
        Self::with_store(config, store)
    }
}

impl<T> NTree<T> {
    /// Create with a custom store
    ///
    /// The store's own capacity wins over `config.capacity`. Any nodes
    /// already in the store are dropped.
    pub fn with_store(mut config: TreeConfig, mut store: Box<dyn NodeStore<T>>) -> Self {
        store.clear();
        config.capacity = store.capacity();

        Self {
            config,
            store: RefCell::new(store),
            root: Cell::new(None),
        }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn policy(&self) -> FailurePolicy {
        self.config.policy
    }

    pub fn max_children(&self) -> usize {
        self.config.max_children
    }

    /// Maximum number of simultaneous nodes
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Number of live nodes
    pub fn count(&self) -> usize {
        self.store().len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.get().is_none()
    }

    pub(crate) fn root_id(&self) -> Option<NodeId> {
        self.root.get()
    }

    pub(crate) fn store(&self) -> Ref<'_, Box<dyn NodeStore<T>>> {
        self.store.borrow()
    }

    /// Exclusive store access; `Busy` while a `with_value` closure runs
    pub(crate) fn store_mut(&self) -> TreeResult<RefMut<'_, Box<dyn NodeStore<T>>>> {
        self.store.try_borrow_mut().map_err(|_| TreeError::Busy)
    }

    pub(crate) fn walker<'s>(&self, store: &'s dyn NodeStore<T>) -> Walker<'s, T> {
        Walker::new(store, self.root.get())
    }

    /// The live node a position addresses, or why there is none
    pub(crate) fn live_id(&self, position: Position) -> Result<NodeId, TreeError> {
        match position {
            Position::At(id) if self.store().is_occupied(id) => Ok(id),
            Position::At(_) => Err(TreeError::InvalidIterator),
            _ => Err(TreeError::NotDereferenceable),
        }
    }

    /// Check a cursor handed to this tree and resolve the node it is on
    fn cursor_target(&self, cursor: &ConstNTreeIterator<'_, T>) -> Result<NodeId, TreeError> {
        if !cursor.belongs_to(self) {
            return Err(TreeError::TreeMismatch);
        }
        self.live_id(cursor.position())
    }

    fn end(&self, order: TraversalOrder) -> NTreeIterator<'_, T> {
        NTreeIterator::from_parts(self, Position::AfterLast, order)
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Create the root, or overwrite its value if it exists
    pub fn set_root_value(&self, value: T) -> TreeResult<()> {
        let mut store = self.store_mut()?;

        if let Some(root) = self.root.get() {
            if let Some(slot) = store.value_mut(root) {
                *slot = value;
            }
            return Ok(());
        }

        match store.allocate(value, None) {
            Ok(root) => {
                self.root.set(Some(root));
                Ok(())
            }
            Err(err) => self.policy().resolve(err.into(), ()),
        }
    }

    /// Append a child under the node `parent` is on
    ///
    /// The returned cursor is on the new node, bound to `parent`'s order.
    pub fn add_child(
        &self,
        parent: &ConstNTreeIterator<'_, T>,
        value: T,
    ) -> TreeResult<NTreeIterator<'_, T>> {
        let order = parent.order();
        let parent_id = match self.cursor_target(parent) {
            Ok(id) => id,
            Err(err) => return self.policy().resolve_with(err, || self.end(order)),
        };

        let mut store = self.store_mut()?;

        if store.children(parent_id).len() >= self.config.max_children {
            drop(store);
            let err = TreeError::TooManyChildren {
                node: parent_id,
                max: self.config.max_children,
            };
            return self.policy().resolve_with(err, || self.end(order));
        }

        let child = match store.allocate(value, Some(parent_id)) {
            Ok(child) => child,
            Err(err) => {
                drop(store);
                return self.policy().resolve_with(err.into(), || self.end(order));
            }
        };
        store.push_child(parent_id, child)?;

        Ok(NTreeIterator::from_parts(self, Position::At(child), order))
    }

    /// Remove the node a cursor is on together with all its descendants
    ///
    /// Returns the number of nodes freed. Every cursor on a removed node is
    /// invalid afterwards; removing the root empties the tree.
    pub fn remove(&self, target: &ConstNTreeIterator<'_, T>) -> TreeResult<usize> {
        let id = match self.cursor_target(target) {
            Ok(id) => id,
            Err(err) => return self.policy().resolve(err, 0),
        };

        let mut store = self.store_mut()?;

        if let Some(parent) = store.parent(id) {
            store.remove_child(parent, id)?;
        }

        let mut pending = vec![id];
        let mut removed = 0;
        while let Some(next) = pending.pop() {
            pending.extend_from_slice(store.children(next));
            if store.free(next).is_some() {
                removed += 1;
            }
        }

        if self.root.get() == Some(id) {
            self.root.set(None);
        }

        debug!("removed {} node(s) under {}", removed, id);
        Ok(removed)
    }

    /// Remove every node
    pub fn clear(&self) -> TreeResult<()> {
        self.store_mut()?.clear();
        self.root.set(None);
        Ok(())
    }

    // ========================================================================
    // CURSOR FACTORIES
    // ========================================================================

    /// Cursor on the root
    pub fn root(&self, order: TraversalOrder) -> TreeResult<NTreeIterator<'_, T>> {
        match self.root.get() {
            Some(root) => Ok(NTreeIterator::from_parts(self, Position::At(root), order)),
            None => self
                .policy()
                .resolve_with(TreeError::EmptyTree, || self.end(order)),
        }
    }

    /// Cursor on the first child (insertion order) of `node`
    pub fn first_child(&self, node: &ConstNTreeIterator<'_, T>) -> TreeResult<NTreeIterator<'_, T>> {
        self.child(node, |children| children.first().copied())
    }

    /// Cursor on the last child (insertion order) of `node`
    pub fn last_child(&self, node: &ConstNTreeIterator<'_, T>) -> TreeResult<NTreeIterator<'_, T>> {
        self.child(node, |children| children.last().copied())
    }

    fn child<F>(&self, node: &ConstNTreeIterator<'_, T>, pick: F) -> TreeResult<NTreeIterator<'_, T>>
    where
        F: FnOnce(&[NodeId]) -> Option<NodeId>,
    {
        let order = node.order();
        let child = self
            .cursor_target(node)
            .and_then(|id| pick(self.store().children(id)).ok_or(TreeError::NoChildren(id)));

        match child {
            Ok(child) => Ok(NTreeIterator::from_parts(self, Position::At(child), order)),
            Err(err) => self.policy().resolve_with(err, || self.end(order)),
        }
    }

    /// Cursor on the parent of `node`, bound to `node`'s order
    pub fn parent(&self, node: &ConstNTreeIterator<'_, T>) -> TreeResult<NTreeIterator<'_, T>> {
        let order = node.order();
        let parent = self
            .cursor_target(node)
            .and_then(|id| self.store().parent(id).ok_or(TreeError::NoParent(id)));

        match parent {
            Ok(parent) => Ok(NTreeIterator::from_parts(self, Position::At(parent), order)),
            Err(err) => self.policy().resolve_with(err, || self.end(order)),
        }
    }

    /// Number of children of the node a cursor is on
    pub fn child_count(&self, node: &ConstNTreeIterator<'_, T>) -> TreeResult<usize> {
        match self.cursor_target(node) {
            Ok(id) => Ok(self.store().children(id).len()),
            Err(err) => self.policy().resolve(err, 0),
        }
    }

    /// Node ids in `order`
    pub fn iter(&self, order: TraversalOrder) -> Traverse<'_, T> {
        let mut cursor = ConstNTreeIterator::from_parts(self, Position::BeforeFirst, order);
        cursor.move_first();
        Traverse::new(cursor)
    }

    /// Cloned values in `order`
    pub fn values(&self, order: TraversalOrder) -> impl Iterator<Item = T> + '_
    where
        T: Clone,
    {
        self.iter(order)
            .filter_map(move |id| self.store().value(id).cloned())
    }
}

impl<T: fmt::Debug> fmt::Debug for NTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.store();
        let walker = self.walker(&**store);
        let mut nodes = Vec::with_capacity(store.len());
        let mut position = walker.first(TraversalOrder::PreOrder);
        while let Position::At(id) = position {
            if let Some(value) = store.value(id) {
                nodes.push(value);
            }
            position = walker.next(id, TraversalOrder::PreOrder);
        }

        f.debug_struct("NTree")
            .field("config", &self.config)
            .field("root", &self.root.get())
            .field("nodes", &nodes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::StoreError;

    const PRE: TraversalOrder = TraversalOrder::PreOrder;

    /// A{B{E,F}, C, D{G}}
    fn sample(policy: FailurePolicy) -> NTree<char> {
        let tree = NTree::with_config(TreeConfig::new(3, 16).with_policy(policy));
        tree.set_root_value('A').unwrap();

        let root = tree.root(PRE).unwrap();
        let b = tree.add_child(&root, 'B').unwrap();
        tree.add_child(&root, 'C').unwrap();
        let d = tree.add_child(&root, 'D').unwrap();
        tree.add_child(&b, 'E').unwrap();
        tree.add_child(&b, 'F').unwrap();
        tree.add_child(&d, 'G').unwrap();

        tree
    }

    fn collect(tree: &NTree<char>, order: TraversalOrder) -> String {
        tree.values(order).collect()
    }

    #[test]
    fn test_new_tree_is_empty() {
        let tree: NTree<char> = NTree::new(2, 8);

        assert!(tree.is_empty());
        assert_eq!(tree.count(), 0);
        assert_eq!(tree.capacity(), 8);
        assert_eq!(tree.max_children(), 2);
        assert_eq!(tree.policy(), FailurePolicy::Raise);
    }

    #[test]
    fn test_set_root_value_creates_then_overwrites() {
        let tree = sample(FailurePolicy::Raise);
        assert_eq!(tree.count(), 7);

        tree.set_root_value('Z').unwrap();

        assert_eq!(tree.count(), 7);
        assert_eq!(collect(&tree, PRE), "ZBEFCDG");
    }

    #[test]
    fn test_set_root_value_zero_capacity() {
        let tree: NTree<char> = NTree::new(2, 0);
        let result = tree.set_root_value('A');
        assert!(matches!(
            result,
            Err(TreeError::Store(StoreError::CapacityExceeded { capacity: 0 }))
        ));

        let tree: NTree<char> = NTree::with_config(TreeConfig::new(2, 0).degrading());
        assert!(tree.set_root_value('A').is_ok());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_add_child_returns_live_cursor() {
        let tree: NTree<char> = NTree::new(2, 4);
        tree.set_root_value('A').unwrap();
        let root = tree.root(PRE).unwrap();

        let child = tree.add_child(&root, 'B').unwrap();

        assert!(child.is_valid());
        assert_eq!(child.get().unwrap(), 'B');
        assert_eq!(child.order(), PRE);
        assert_eq!(tree.count(), 2);
    }

    #[test]
    fn test_add_child_keeps_parent_order() {
        let tree: NTree<char> = NTree::new(2, 4);
        tree.set_root_value('A').unwrap();
        let root = tree.root(TraversalOrder::PostOrder).unwrap();

        let child = tree.add_child(&root, 'B').unwrap();
        assert_eq!(child.order(), TraversalOrder::PostOrder);
    }

    #[test]
    fn test_add_child_too_many_children() {
        let tree = sample(FailurePolicy::Raise);
        let root = tree.root(PRE).unwrap();

        let result = tree.add_child(&root, 'X');

        assert!(matches!(result, Err(TreeError::TooManyChildren { max: 3, .. })));
        assert_eq!(tree.count(), 7);
    }

    #[test]
    fn test_add_child_too_many_children_degrades() {
        let tree = sample(FailurePolicy::Degrade);
        let root = tree.root(PRE).unwrap();

        let end = tree.add_child(&root, 'X').unwrap();

        assert!(end.is_end());
        assert_eq!(tree.count(), 7);
    }

    #[test]
    fn test_add_child_capacity_exceeded() {
        let tree: NTree<u32> = NTree::new(8, 2);
        tree.set_root_value(0).unwrap();
        let root = tree.root(PRE).unwrap();
        tree.add_child(&root, 1).unwrap();

        let result = tree.add_child(&root, 2);

        assert!(matches!(
            result,
            Err(TreeError::Store(StoreError::CapacityExceeded { capacity: 2 }))
        ));
    }

    #[test]
    fn test_add_child_invalid_parent() {
        let tree = sample(FailurePolicy::Raise);
        let mut end = tree.root(PRE).unwrap();
        end.move_last();
        end.move_next().unwrap();

        assert!(matches!(
            tree.add_child(&end, 'X'),
            Err(TreeError::NotDereferenceable)
        ));
    }

    #[test]
    fn test_add_child_foreign_parent() {
        let tree = sample(FailurePolicy::Raise);
        let other = sample(FailurePolicy::Raise);
        let foreign = other.root(PRE).unwrap();

        assert!(matches!(
            tree.add_child(&foreign, 'X'),
            Err(TreeError::TreeMismatch)
        ));
        assert_eq!(other.count(), 7);
    }

    #[test]
    fn test_root_on_empty_tree() {
        let tree: NTree<char> = NTree::new(2, 4);
        assert!(matches!(tree.root(PRE), Err(TreeError::EmptyTree)));

        let tree: NTree<char> = NTree::with_config(TreeConfig::new(2, 4).degrading());
        let end = tree.root(PRE).unwrap();
        assert!(end.is_end_in(crate::core::Direction::Forward));
    }

    #[test]
    fn test_first_and_last_child() {
        let tree = sample(FailurePolicy::Raise);
        let root = tree.root(PRE).unwrap();

        let first = tree.first_child(&root).unwrap();
        let last = tree.last_child(&root).unwrap();

        assert_eq!(first.get().unwrap(), 'B');
        assert_eq!(last.get().unwrap(), 'D');
        assert_eq!(tree.child_count(&root).unwrap(), 3);
    }

    #[test]
    fn test_child_of_leaf() {
        let tree = sample(FailurePolicy::Raise);
        let root = tree.root(PRE).unwrap();
        let mut c = tree.first_child(&root).unwrap();
        c.move_forward(3).unwrap();
        assert_eq!(c.get().unwrap(), 'C');

        assert!(matches!(tree.first_child(&c), Err(TreeError::NoChildren(_))));
        assert!(matches!(tree.last_child(&c), Err(TreeError::NoChildren(_))));
    }

    #[test]
    fn test_child_of_leaf_degrades() {
        let tree = sample(FailurePolicy::Degrade);
        let mut g = tree.root(PRE).unwrap();
        g.move_last();

        let end = tree.first_child(&g).unwrap();
        assert!(end.is_end());
        assert_eq!(end.order(), PRE);
    }

    #[test]
    fn test_parent() {
        let tree = sample(FailurePolicy::Raise);
        let root = tree.root(PRE).unwrap();
        let d = tree.last_child(&root).unwrap();
        let g = tree.first_child(&d).unwrap();

        assert_eq!(tree.parent(&g).unwrap(), d);
        assert_eq!(tree.parent(&d).unwrap(), root);
        assert!(matches!(tree.parent(&root), Err(TreeError::NoParent(_))));

        let lenient = sample(FailurePolicy::Degrade);
        let root = lenient.root(PRE).unwrap();
        assert!(lenient.parent(&root).unwrap().is_end());
    }

    #[test]
    fn test_remove_cascades() {
        let tree = sample(FailurePolicy::Raise);
        let root = tree.root(PRE).unwrap();
        let b = tree.first_child(&root).unwrap();

        let removed = tree.remove(&b).unwrap();

        assert_eq!(removed, 3);
        assert_eq!(tree.count(), 4);
        assert_eq!(collect(&tree, PRE), "ACDG");
        assert!(!b.is_valid());
    }

    #[test]
    fn test_remove_root_empties_tree() {
        let tree = sample(FailurePolicy::Raise);
        let root = tree.root(PRE).unwrap();

        assert_eq!(tree.remove(&root).unwrap(), 7);
        assert!(tree.is_empty());
        assert_eq!(tree.count(), 0);
        assert!(matches!(tree.root(PRE), Err(TreeError::EmptyTree)));

        // A fresh root can be planted afterwards
        tree.set_root_value('R').unwrap();
        assert_eq!(collect(&tree, PRE), "R");
    }

    #[test]
    fn test_remove_twice() {
        let tree = sample(FailurePolicy::Raise);
        let root = tree.root(PRE).unwrap();
        let d = tree.last_child(&root).unwrap();

        tree.remove(&d).unwrap();

        assert!(matches!(tree.remove(&d), Err(TreeError::InvalidIterator)));

        let lenient = sample(FailurePolicy::Degrade);
        let root = lenient.root(PRE).unwrap();
        let d = lenient.last_child(&root).unwrap();
        lenient.remove(&d).unwrap();
        assert_eq!(lenient.remove(&d).unwrap(), 0);
    }

    #[test]
    fn test_removed_slot_reuse_keeps_stale_cursor_invalid() {
        let tree = sample(FailurePolicy::Raise);
        let root = tree.root(PRE).unwrap();
        let mut c = tree.first_child(&root).unwrap();
        c.move_forward(3).unwrap();

        assert_eq!(tree.remove(&c).unwrap(), 1);
        let fresh = tree.add_child(&root, 'X').unwrap();

        // Slot recycled, old cursor still dead
        assert_eq!(
            fresh.node_id().map(|id| id.index()),
            c.node_id().map(|id| id.index())
        );
        assert!(!c.is_valid());
        assert!(fresh.is_valid());
        assert_eq!(collect(&tree, PRE), "ABEFDGX");
    }

    #[test]
    fn test_clear() {
        let tree = sample(FailurePolicy::Raise);
        let root = tree.root(PRE).unwrap();

        tree.clear().unwrap();

        assert!(tree.is_empty());
        assert_eq!(tree.count(), 0);
        assert!(!root.is_valid());
    }

    #[test]
    fn test_iter_orders() {
        let tree = sample(FailurePolicy::Raise);

        assert_eq!(collect(&tree, PRE), "ABEFCDG");
        assert_eq!(collect(&tree, TraversalOrder::PostOrder), "EFBCGDA");
        assert_eq!(collect(&tree, TraversalOrder::BreadthFirst), "ABCDEFG");
        assert_eq!(tree.iter(PRE).count(), 7);
    }

    #[test]
    fn test_busy_on_reentrant_mutation() {
        let tree = sample(FailurePolicy::Raise);
        let root = tree.root(PRE).unwrap();

        let nested = root.with_value(|_| tree.add_child(&root, 'X').map(|_| ()));

        assert!(matches!(nested, Ok(Err(TreeError::Busy))));
        assert_eq!(tree.count(), 7);
    }

    #[test]
    fn test_custom_store() {
        let store: Box<dyn NodeStore<char>> = Box::new(ArenaStore::with_capacity(3));
        let tree = NTree::with_store(TreeConfig::new(2, 100), store);

        assert_eq!(tree.capacity(), 3);
    }

    #[test]
    fn test_debug_lists_nodes() {
        let tree = sample(FailurePolicy::Raise);
        let debug = format!("{:?}", tree);
        assert!(debug.contains("['A', 'B', 'E', 'F', 'C', 'D', 'G']"));
    }
}
