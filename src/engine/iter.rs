//! # Tree Cursors
//!
//! `ConstNTreeIterator` and `NTreeIterator` are bidirectional cursors over an
//! `NTree`, each bound to one `TraversalOrder` for its whole life.
//!
//! ```text
//!   BeforeFirst <-> At(first) <-> ... <-> At(last) <-> AfterLast
//! ```
//!
//! A cursor only borrows its tree. Validity is read through the tree on every
//! call, so removing a node invalidates all cursors on it immediately.
//! Precondition violations go through the tree's `FailurePolicy`.

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Deref, DerefMut};
use std::ptr;

use super::traversal::Walker;
use super::tree::NTree;
use crate::core::{Direction, NodeId, Position, TraversalOrder};
use crate::error::{TreeError, TreeResult};

/// Read-only cursor over an `NTree`
pub struct ConstNTreeIterator<'a, T> {
    tree: &'a NTree<T>,
    position: Position,
    order: TraversalOrder,
}

impl<'a, T> ConstNTreeIterator<'a, T> {
    /// Cursor on the node stored at slot `index`
    ///
    /// An index past the capacity or naming an empty slot is a violation;
    /// the degraded cursor sits on `AfterLast`.
    pub fn new(tree: &'a NTree<T>, index: usize, order: TraversalOrder) -> TreeResult<Self> {
        let end = Self::from_parts(tree, Position::AfterLast, order);
        let capacity = tree.capacity();
        if index >= capacity {
            return tree
                .policy()
                .resolve(TreeError::IndexOutOfRange { index, capacity }, end);
        }

        let id = tree.store().id_at(index);
        match id {
            Some(id) => Ok(Self::from_parts(tree, Position::At(id), order)),
            None => tree.policy().resolve(TreeError::InvalidIterator, end),
        }
    }

    /// Cursor `rank` steps after the first node of `order`
    ///
    /// Ranks past the last node give `AfterLast`.
    pub fn at_rank(tree: &'a NTree<T>, rank: usize, order: TraversalOrder) -> Self {
        let position = {
            let store = tree.store();
            tree.walker(&**store).nth(rank, order)
        };
        Self::from_parts(tree, position, order)
    }

    pub(crate) fn from_parts(tree: &'a NTree<T>, position: Position, order: TraversalOrder) -> Self {
        Self {
            tree,
            position,
            order,
        }
    }

    fn walk<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&Walker<'_, T>) -> R,
    {
        let store = self.tree.store();
        f(&self.tree.walker(&**store))
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn tree(&self) -> &'a NTree<T> {
        self.tree
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn node_id(&self) -> Option<NodeId> {
        self.position.node_id()
    }

    pub fn order(&self) -> TraversalOrder {
        self.order
    }

    pub fn belongs_to(&self, tree: &NTree<T>) -> bool {
        ptr::eq(self.tree, tree)
    }

    pub fn same_tree(&self, other: &ConstNTreeIterator<'_, T>) -> bool {
        ptr::eq(self.tree, other.tree)
    }

    /// On a node that is still in the tree
    ///
    /// Sentinels are not valid, and neither is a node removed since.
    pub fn is_valid(&self) -> bool {
        match self.position {
            Position::At(id) => {
                id.index() < self.tree.capacity() && self.tree.store().is_occupied(id)
            }
            _ => false,
        }
    }

    /// On either sentinel
    pub fn is_end(&self) -> bool {
        self.position.is_sentinel()
    }

    /// On the sentinel reached by running out of nodes in `direction`
    pub fn is_end_in(&self, direction: Direction) -> bool {
        self.position == direction.end()
    }

    /// Zero-based offset from the first node, `None` off the tree
    pub fn rank(&self) -> Option<usize> {
        let id = self.position.node_id()?;
        self.walk(|walker| walker.rank(id, self.order))
    }

    /// Sort key in `order`: sentinels bracket the ranked nodes
    fn ordinal(&self, order: TraversalOrder) -> Option<usize> {
        match self.position {
            Position::BeforeFirst => Some(0),
            Position::At(id) => self
                .walk(|walker| walker.rank(id, order))
                .map(|rank| rank + 1),
            Position::AfterLast => Some(usize::MAX),
        }
    }

    // ========================================================================
    // MOVEMENT
    // ========================================================================

    /// Jump to the first node; `AfterLast` on an empty tree
    pub fn move_first(&mut self) {
        let order = self.order;
        self.position = self.walk(|walker| walker.first(order));
    }

    /// Jump to the last node; `AfterLast` on an empty tree
    pub fn move_last(&mut self) {
        let order = self.order;
        self.position = self.walk(|walker| walker.last(order));
    }

    /// One step forward (`++`)
    pub fn move_next(&mut self) -> TreeResult<()> {
        self.step(Direction::Forward)
    }

    /// One step backward (`--`)
    pub fn move_prev(&mut self) -> TreeResult<()> {
        self.step(Direction::Backward)
    }

    /// `steps` steps forward, stopping on `AfterLast`
    pub fn move_forward(&mut self, steps: usize) -> TreeResult<()> {
        self.move_by(steps, Direction::Forward)
    }

    /// `steps` steps backward, stopping on `BeforeFirst`
    pub fn move_backward(&mut self, steps: usize) -> TreeResult<()> {
        self.move_by(steps, Direction::Backward)
    }

    fn step(&mut self, direction: Direction) -> TreeResult<()> {
        let policy = self.tree.policy();

        if self.position == direction.end() {
            return policy.resolve(TreeError::StepPastEnd(direction), ());
        }

        if let Position::At(id) = self.position {
            if !self.tree.store().is_occupied(id) {
                return policy.resolve_with(TreeError::InvalidIterator, || {
                    self.position = direction.end();
                });
            }
        }

        let (position, order) = (self.position, self.order);
        self.position = self.walk(|walker| walker.advance(position, direction, order));
        Ok(())
    }

    fn move_by(&mut self, steps: usize, direction: Direction) -> TreeResult<()> {
        if steps == 0 {
            return Ok(());
        }
        if self.position == direction.end() {
            return self
                .tree
                .policy()
                .resolve(TreeError::StepPastEnd(direction), ());
        }

        for _ in 0..steps {
            self.step(direction)?;
            if self.position == direction.end() {
                break;
            }
        }
        Ok(())
    }

    // ========================================================================
    // ACCESS
    // ========================================================================

    fn deref_error(&self) -> TreeError {
        match self.position {
            Position::At(_) => TreeError::InvalidIterator,
            _ => TreeError::NotDereferenceable,
        }
    }

    /// Copy of the value under the cursor
    ///
    /// Degraded result off the tree: `T::default()`.
    pub fn get(&self) -> TreeResult<T>
    where
        T: Clone + Default,
    {
        let value = self
            .position
            .node_id()
            .and_then(|id| self.tree.store().value(id).cloned());

        match value {
            Some(value) => Ok(value),
            None => self.tree.policy().resolve_with(self.deref_error(), T::default),
        }
    }

    /// Run `f` on the value under the cursor
    ///
    /// The tree cannot be edited from inside `f` (edits return `Busy`).
    /// Degraded off the tree, `f` sees a scratch `T::default()`.
    pub fn with_value<R, F>(&self, f: F) -> TreeResult<R>
    where
        T: Default,
        F: FnOnce(&T) -> R,
    {
        {
            let store = self.tree.store();
            if let Some(value) = self.position.node_id().and_then(|id| store.value(id)) {
                return Ok(f(value));
            }
        }

        self.tree
            .policy()
            .resolve_with(self.deref_error(), || f(&T::default()))
    }

    // ========================================================================
    // COMPARISON
    // ========================================================================

    /// Equality that reports cross-tree comparison
    pub fn try_eq(&self, other: &ConstNTreeIterator<'_, T>) -> TreeResult<bool> {
        if !self.same_tree(other) {
            return self.tree.policy().resolve(TreeError::TreeMismatch, false);
        }
        Ok(self.order == other.order && self.position == other.position)
    }

    /// Ordering by rank in this cursor's order
    ///
    /// `BeforeFirst` sorts first and `AfterLast` last. Degraded cross-tree
    /// comparisons order by tree address; removed nodes sort with `AfterLast`.
    pub fn try_cmp(&self, other: &ConstNTreeIterator<'_, T>) -> TreeResult<Ordering> {
        let policy = self.tree.policy();

        if !self.same_tree(other) {
            let by_address = (self.tree as *const NTree<T>).cmp(&(other.tree as *const NTree<T>));
            return policy.resolve(TreeError::TreeMismatch, by_address);
        }

        match (self.ordinal(self.order), other.ordinal(self.order)) {
            (Some(a), Some(b)) => Ok(a.cmp(&b)),
            (a, b) => {
                let fallback = a.unwrap_or(usize::MAX).cmp(&b.unwrap_or(usize::MAX));
                policy.resolve(TreeError::InvalidIterator, fallback)
            }
        }
    }

    /// Take over `other`'s position and order
    ///
    /// Copies even when `other` is invalid. Across trees this is a violation
    /// and the cursor is left untouched.
    pub fn assign_from(&mut self, other: &ConstNTreeIterator<'_, T>) -> TreeResult<()> {
        if !self.same_tree(other) {
            return self.tree.policy().resolve(TreeError::TreeMismatch, ());
        }
        self.position = other.position;
        self.order = other.order;
        Ok(())
    }
}

impl<'a, T> Clone for ConstNTreeIterator<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for ConstNTreeIterator<'a, T> {}

impl<'a, 'b, T> PartialEq<ConstNTreeIterator<'b, T>> for ConstNTreeIterator<'a, T> {
    fn eq(&self, other: &ConstNTreeIterator<'b, T>) -> bool {
        self.same_tree(other) && self.order == other.order && self.position == other.position
    }
}

impl<'a, T> Eq for ConstNTreeIterator<'a, T> {}

impl<'a, 'b, T> PartialOrd<ConstNTreeIterator<'b, T>> for ConstNTreeIterator<'a, T> {
    /// `None` across trees or orders, and for removed nodes
    fn partial_cmp(&self, other: &ConstNTreeIterator<'b, T>) -> Option<Ordering> {
        if !self.same_tree(other) || self.order != other.order {
            return None;
        }
        if self.position == other.position {
            return Some(Ordering::Equal);
        }
        Some(self.ordinal(self.order)?.cmp(&other.ordinal(self.order)?))
    }
}

impl<'a, T> fmt::Debug for ConstNTreeIterator<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstNTreeIterator")
            .field("position", &self.position)
            .field("order", &self.order)
            .finish()
    }
}

/// Cursor that can also edit the tree
///
/// Derefs to [`ConstNTreeIterator`] for movement and queries.
pub struct NTreeIterator<'a, T> {
    inner: ConstNTreeIterator<'a, T>,
}

impl<'a, T> NTreeIterator<'a, T> {
    /// See [`ConstNTreeIterator::new`]
    pub fn new(tree: &'a NTree<T>, index: usize, order: TraversalOrder) -> TreeResult<Self> {
        ConstNTreeIterator::new(tree, index, order).map(|inner| Self { inner })
    }

    /// See [`ConstNTreeIterator::at_rank`]
    pub fn at_rank(tree: &'a NTree<T>, rank: usize, order: TraversalOrder) -> Self {
        Self {
            inner: ConstNTreeIterator::at_rank(tree, rank, order),
        }
    }

    pub(crate) fn from_parts(tree: &'a NTree<T>, position: Position, order: TraversalOrder) -> Self {
        Self {
            inner: ConstNTreeIterator::from_parts(tree, position, order),
        }
    }

    pub fn as_const(&self) -> ConstNTreeIterator<'a, T> {
        self.inner
    }

    /// Overwrite the value under the cursor
    pub fn set(&self, value: T) -> TreeResult<()> {
        let tree = self.inner.tree;
        match tree.live_id(self.inner.position) {
            Ok(id) => {
                if let Some(slot) = tree.store_mut()?.value_mut(id) {
                    *slot = value;
                }
                Ok(())
            }
            Err(err) => tree.policy().resolve(err, ()),
        }
    }

    /// Edit the value under the cursor in place
    ///
    /// The value is moved out for the duration of `f`; the node reads as
    /// `T::default()` to anyone looking meanwhile. Degraded off the tree,
    /// `f` edits a scratch value that is thrown away.
    pub fn with_value_mut<R, F>(&self, f: F) -> TreeResult<R>
    where
        T: Default,
        F: FnOnce(&mut T) -> R,
    {
        let tree = self.inner.tree;
        let id = match tree.live_id(self.inner.position) {
            Ok(id) => id,
            Err(err) => return tree.policy().resolve_with(err, || f(&mut T::default())),
        };

        let mut value = tree
            .store_mut()?
            .value_mut(id)
            .map(std::mem::take)
            .unwrap_or_default();

        let result = f(&mut value);

        if let Some(slot) = tree.store_mut()?.value_mut(id) {
            *slot = value;
        }
        Ok(result)
    }

    /// Append a child under the cursor's node
    pub fn add_child(&self, value: T) -> TreeResult<NTreeIterator<'a, T>> {
        self.inner.tree.add_child(&self.inner, value)
    }

    /// Remove the cursor's node and its subtree
    ///
    /// The cursor stays where it was and is invalid afterwards.
    pub fn remove(&self) -> TreeResult<usize> {
        self.inner.tree.remove(&self.inner)
    }
}

impl<'a, T> Deref for NTreeIterator<'a, T> {
    type Target = ConstNTreeIterator<'a, T>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<'a, T> DerefMut for NTreeIterator<'a, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<'a, T> From<NTreeIterator<'a, T>> for ConstNTreeIterator<'a, T> {
    fn from(iter: NTreeIterator<'a, T>) -> Self {
        iter.inner
    }
}

impl<'a, T> Clone for NTreeIterator<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for NTreeIterator<'a, T> {}

impl<'a, 'b, T> PartialEq<NTreeIterator<'b, T>> for NTreeIterator<'a, T> {
    fn eq(&self, other: &NTreeIterator<'b, T>) -> bool {
        self.inner == other.inner
    }
}

impl<'a, T> Eq for NTreeIterator<'a, T> {}

impl<'a, 'b, T> PartialOrd<NTreeIterator<'b, T>> for NTreeIterator<'a, T> {
    fn partial_cmp(&self, other: &NTreeIterator<'b, T>) -> Option<Ordering> {
        self.inner.partial_cmp(&other.inner)
    }
}

impl<'a, T> fmt::Debug for NTreeIterator<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NTreeIterator")
            .field("position", &self.inner.position)
            .field("order", &self.inner.order)
            .finish()
    }
}

/// `Iterator` over node ids in one order
///
/// Created by [`NTree::iter`]. Stops early if the next node is removed
/// while iterating.
pub struct Traverse<'a, T> {
    cursor: ConstNTreeIterator<'a, T>,
}

impl<'a, T> Traverse<'a, T> {
    pub(crate) fn new(cursor: ConstNTreeIterator<'a, T>) -> Self {
        Self { cursor }
    }
}

impl<'a, T> Iterator for Traverse<'a, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.cursor.node_id()?;
        if !self.cursor.is_valid() {
            self.cursor.position = Position::AfterLast;
            return None;
        }

        let order = self.cursor.order;
        self.cursor.position = self.cursor.walk(|walker| walker.next(id, order));
        Some(id)
    }
}

impl<'a, T> FusedIterator for Traverse<'a, T> {}
