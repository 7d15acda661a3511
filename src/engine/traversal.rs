//! # Traversal
//!
//! Stepping rules for every `TraversalOrder`.
//!
//! A `Walker` reads parent/child links through the `NodeStore` port and
//! computes the neighbour of a node in a given order. Running out of nodes
//! yields the sentinel for that direction. Callers must only pass live ids.

use crate::core::{Direction, NodeId, Position, TraversalOrder};
use crate::ports::NodeStore;

/// Read-only view of a tree's links
pub(crate) struct Walker<'s, T> {
    store: &'s dyn NodeStore<T>,
    root: Option<NodeId>,
}

impl<'s, T> Walker<'s, T> {
    pub(crate) fn new(store: &'s dyn NodeStore<T>, root: Option<NodeId>) -> Self {
        Self { store, root }
    }

    // ========================================================================
    // ENTRY POINTS
    // ========================================================================

    /// First node of the order, `AfterLast` on an empty tree
    pub(crate) fn first(&self, order: TraversalOrder) -> Position {
        let Some(root) = self.root else {
            return Position::AfterLast;
        };

        match order {
            TraversalOrder::PreOrder | TraversalOrder::BreadthFirst => Position::At(root),
            TraversalOrder::PostOrder => Position::At(self.deepest_first(root)),
        }
    }

    /// Last node of the order, `AfterLast` on an empty tree
    pub(crate) fn last(&self, order: TraversalOrder) -> Position {
        let Some(root) = self.root else {
            return Position::AfterLast;
        };

        match order {
            TraversalOrder::PreOrder => Position::At(self.deepest_last(root)),
            TraversalOrder::PostOrder => Position::At(root),
            TraversalOrder::BreadthFirst => {
                let mut level = vec![root];
                loop {
                    let below = self.expand(&level);
                    if below.is_empty() {
                        break;
                    }
                    level = below;
                }
                level.last().map_or(Position::AfterLast, |&id| Position::At(id))
            }
        }
    }

    /// Where a cursor sitting on `position` lands after one step
    ///
    /// From the sentinel opposite to `direction` this enters the tree.
    /// From the sentinel in `direction` it stays put.
    pub(crate) fn advance(
        &self,
        position: Position,
        direction: Direction,
        order: TraversalOrder,
    ) -> Position {
        match (position, direction) {
            (Position::At(id), _) => self.step(id, direction, order),
            (Position::BeforeFirst, Direction::Forward) => self.first(order),
            (Position::AfterLast, Direction::Backward) => self.last(order),
            (sentinel, _) => sentinel,
        }
    }

    pub(crate) fn step(&self, id: NodeId, direction: Direction, order: TraversalOrder) -> Position {
        match direction {
            Direction::Forward => self.next(id, order),
            Direction::Backward => self.prev(id, order),
        }
    }

    pub(crate) fn next(&self, id: NodeId, order: TraversalOrder) -> Position {
        match order {
            TraversalOrder::PreOrder => self.pre_order_next(id),
            TraversalOrder::PostOrder => self.post_order_next(id),
            TraversalOrder::BreadthFirst => self.level_order_next(id),
        }
    }

    pub(crate) fn prev(&self, id: NodeId, order: TraversalOrder) -> Position {
        match order {
            TraversalOrder::PreOrder => self.pre_order_prev(id),
            TraversalOrder::PostOrder => self.post_order_prev(id),
            TraversalOrder::BreadthFirst => self.level_order_prev(id),
        }
    }

    /// Zero-based offset of `id` from the first node of the order
    pub(crate) fn rank(&self, id: NodeId, order: TraversalOrder) -> Option<usize> {
        let mut position = self.first(order);
        let mut rank = 0;

        while let Position::At(current) = position {
            if current == id {
                return Some(rank);
            }
            rank += 1;
            position = self.next(current, order);
        }

        None
    }

    /// Node at zero-based offset `rank`, `AfterLast` past the end
    pub(crate) fn nth(&self, rank: usize, order: TraversalOrder) -> Position {
        let mut position = self.first(order);

        for _ in 0..rank {
            match position {
                Position::At(current) => position = self.next(current, order),
                _ => break,
            }
        }

        position
    }

    pub(crate) fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.store.parent(current) {
            depth += 1;
            current = parent;
        }
        depth
    }

    // ========================================================================
    // PRE-ORDER
    // ========================================================================

    fn pre_order_next(&self, id: NodeId) -> Position {
        if let Some(&child) = self.store.children(id).first() {
            return Position::At(child);
        }

        let mut current = id;
        loop {
            if let Some(sibling) = self.sibling(current, Direction::Forward) {
                return Position::At(sibling);
            }
            match self.store.parent(current) {
                Some(parent) => current = parent,
                None => return Position::AfterLast,
            }
        }
    }

    fn pre_order_prev(&self, id: NodeId) -> Position {
        if let Some(sibling) = self.sibling(id, Direction::Backward) {
            return Position::At(self.deepest_last(sibling));
        }

        match self.store.parent(id) {
            Some(parent) => Position::At(parent),
            None => Position::BeforeFirst,
        }
    }

    // ========================================================================
    // POST-ORDER
    // ========================================================================

    fn post_order_next(&self, id: NodeId) -> Position {
        let Some(parent) = self.store.parent(id) else {
            return Position::AfterLast;
        };

        match self.sibling(id, Direction::Forward) {
            Some(sibling) => Position::At(self.deepest_first(sibling)),
            None => Position::At(parent),
        }
    }

    fn post_order_prev(&self, id: NodeId) -> Position {
        if let Some(&child) = self.store.children(id).last() {
            return Position::At(child);
        }

        let mut current = id;
        loop {
            if let Some(sibling) = self.sibling(current, Direction::Backward) {
                return Position::At(sibling);
            }
            match self.store.parent(current) {
                Some(parent) => current = parent,
                None => return Position::BeforeFirst,
            }
        }
    }

    // ========================================================================
    // BREADTH-FIRST
    // ========================================================================

    fn level_order_next(&self, id: NodeId) -> Position {
        if let Some(next) = self.same_depth(id, Direction::Forward) {
            return Position::At(next);
        }

        let depth = self.depth(id) + 1;
        self.root
            .and_then(|root| self.edge_at(root, depth, Direction::Forward))
            .map_or(Position::AfterLast, Position::At)
    }

    fn level_order_prev(&self, id: NodeId) -> Position {
        if let Some(prev) = self.same_depth(id, Direction::Backward) {
            return Position::At(prev);
        }

        let Some(depth) = self.depth(id).checked_sub(1) else {
            return Position::BeforeFirst;
        };
        self.root
            .and_then(|root| self.edge_at(root, depth, Direction::Backward))
            .map_or(Position::BeforeFirst, Position::At)
    }

    /// Neighbour on the same level, found through the nearest ancestor
    /// with a sibling in `direction` that reaches that deep
    fn same_depth(&self, id: NodeId, direction: Direction) -> Option<NodeId> {
        let mut current = id;
        let mut up = 0;

        loop {
            let mut sibling = self.sibling(current, direction);
            while let Some(candidate) = sibling {
                if let Some(found) = self.edge_at(candidate, up, direction) {
                    return Some(found);
                }
                sibling = self.sibling(candidate, direction);
            }

            current = self.store.parent(current)?;
            up += 1;
        }
    }

    /// Outermost node `depth` levels below `start`: leftmost going forward,
    /// rightmost going backward
    fn edge_at(&self, start: NodeId, depth: usize, direction: Direction) -> Option<NodeId> {
        let mut stack = vec![(start, 0)];

        while let Some((id, level)) = stack.pop() {
            if level == depth {
                return Some(id);
            }
            let children = self.store.children(id).iter().map(|&child| (child, level + 1));
            match direction {
                Direction::Forward => stack.extend(children.rev()),
                Direction::Backward => stack.extend(children),
            }
        }

        None
    }

    fn expand(&self, level: &[NodeId]) -> Vec<NodeId> {
        level
            .iter()
            .flat_map(|&id| self.store.children(id).iter().copied())
            .collect()
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    /// Adjacent sibling in insertion order
    fn sibling(&self, id: NodeId, direction: Direction) -> Option<NodeId> {
        let parent = self.store.parent(id)?;
        let siblings = self.store.children(parent);
        let offset = siblings.iter().position(|&node| node == id)?;

        match direction {
            Direction::Forward => siblings.get(offset + 1).copied(),
            Direction::Backward => offset.checked_sub(1).map(|prev| siblings[prev]),
        }
    }

    fn deepest_first(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(&child) = self.store.children(current).first() {
            current = child;
        }
        current
    }

    fn deepest_last(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(&child) = self.store.children(current).last() {
            current = child;
        }
        current
    }
}
