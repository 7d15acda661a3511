//! # Arena Storage Adapter
//!
//! Fixed-capacity slot arena with a free list.
//! Slots are recycled LIFO; each free bumps the slot's generation so stale
//! ids are rejected by `is_occupied`.

use log::{trace, warn};

use crate::core::{Node, NodeId};
use crate::ports::{NodeStore, StoreError, StoreResult};

/// One arena slot
#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

/// Arena node store
#[derive(Debug, Clone)]
pub struct ArenaStore<T> {
    /// Every slot ever handed out; never shrinks until `clear`
    slots: Vec<Slot<T>>,

    /// Indices of freed slots
    free_list: Vec<usize>,

    /// Maximum number of live nodes
    capacity: usize,

    /// Current number of live nodes
    len: usize,
}

impl<T> ArenaStore<T> {
    /// Create an arena holding at most `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            capacity,
            len: 0,
        }
    }

    fn slot(&self, id: NodeId) -> Option<&Slot<T>> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
    }
}

impl<T> NodeStore<T> for ArenaStore<T> {
    fn allocate(&mut self, value: T, parent: Option<NodeId>) -> StoreResult<NodeId> {
        if self.len >= self.capacity {
            warn!("arena full: capacity {}", self.capacity);
            return Err(StoreError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let node = Node::new(value, parent);
        let index = match self.free_list.pop() {
            Some(index) => {
                self.slots[index].node = Some(node);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.slots.len() - 1
            }
        };

        self.len += 1;
        let id = NodeId::new(index, self.slots[index].generation);
        trace!("allocated {}", id);
        Ok(id)
    }

    fn free(&mut self, id: NodeId) -> Option<T> {
        let slot = self
            .slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())?;

        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.index());
        self.len -= 1;
        trace!("freed {}", id);
        Some(node.value)
    }

    fn is_occupied(&self, id: NodeId) -> bool {
        self.slot(id).map_or(false, |slot| slot.node.is_some())
    }

    fn id_at(&self, index: usize) -> Option<NodeId> {
        self.slots
            .get(index)
            .filter(|slot| slot.node.is_some())
            .map(|slot| NodeId::new(index, slot.generation))
    }

    fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.slot(id).and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        // Keep generations so ids from before the clear stay dead.
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free_list.push(index);
            }
        }
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_allocate() {
        let mut arena = ArenaStore::with_capacity(4);

        let id = arena.allocate('a', None).unwrap();

        assert_eq!(arena.len(), 1);
        assert!(arena.is_occupied(id));
        assert_eq!(arena.value(id), Some(&'a'));
    }

    #[test]
    fn test_arena_capacity() {
        let mut arena = ArenaStore::with_capacity(2);

        arena.allocate(1, None).unwrap();
        arena.allocate(2, None).unwrap();

        let result = arena.allocate(3, None);
        assert!(matches!(
            result,
            Err(StoreError::CapacityExceeded { capacity: 2 })
        ));
        assert!(arena.is_full());
    }

    #[test]
    fn test_arena_zero_capacity() {
        let mut arena: ArenaStore<u8> = ArenaStore::with_capacity(0);
        assert!(arena.allocate(1, None).is_err());
        assert!(arena.is_empty());
    }

    #[test]
    fn test_arena_free_and_reuse() {
        let mut arena = ArenaStore::with_capacity(4);

        let a = arena.allocate("a", None).unwrap();
        let b = arena.allocate("b", Some(a)).unwrap();

        assert_eq!(arena.free(b), Some("b"));
        assert!(!arena.is_occupied(b));
        assert_eq!(arena.len(), 1);

        // Same slot, new generation
        let c = arena.allocate("c", Some(a)).unwrap();
        assert_eq!(c.index(), b.index());
        assert_ne!(c.generation(), b.generation());
        assert!(!arena.is_occupied(b));
        assert!(arena.is_occupied(c));
        assert_eq!(arena.value(b), None);
    }

    #[test]
    fn test_arena_double_free() {
        let mut arena = ArenaStore::with_capacity(2);
        let a = arena.allocate(1, None).unwrap();

        assert_eq!(arena.free(a), Some(1));
        assert_eq!(arena.free(a), None);
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn test_arena_indices_stable() {
        let mut arena = ArenaStore::with_capacity(4);

        let a = arena.allocate(0, None).unwrap();
        let b = arena.allocate(1, None).unwrap();
        let c = arena.allocate(2, None).unwrap();

        arena.free(b);

        assert_eq!(arena.value(a), Some(&0));
        assert_eq!(arena.value(c), Some(&2));
        assert_eq!(arena.id_at(c.index()), Some(c));
        assert_eq!(arena.id_at(b.index()), None);
    }

    #[test]
    fn test_arena_child_links() {
        let mut arena = ArenaStore::with_capacity(4);

        let root = arena.allocate('r', None).unwrap();
        let x = arena.allocate('x', Some(root)).unwrap();
        let y = arena.allocate('y', Some(root)).unwrap();
        arena.push_child(root, x).unwrap();
        arena.push_child(root, y).unwrap();

        assert_eq!(arena.children(root), &[x, y]);
        assert_eq!(arena.parent(y), Some(root));

        arena.remove_child(root, x).unwrap();
        assert_eq!(arena.children(root), &[y]);
    }

    #[test]
    fn test_arena_borrowed_values() {
        let words = vec![String::from("root"), String::from("leaf")];
        let mut arena: ArenaStore<&str> = ArenaStore::with_capacity(2);

        let root = arena.allocate(words[0].as_str(), None).unwrap();
        let leaf = arena.allocate(words[1].as_str(), Some(root)).unwrap();
        arena.push_child(root, leaf).unwrap();

        let store: &dyn NodeStore<&str> = &arena;
        assert_eq!(store.children(root), &[leaf]);
        assert_eq!(store.value(leaf), Some(&"leaf"));
    }

    #[test]
    fn test_arena_clear() {
        let mut arena = ArenaStore::with_capacity(8);

        let ids: Vec<_> = (0..5).map(|i| arena.allocate(i, None).unwrap()).collect();
        assert_eq!(arena.len(), 5);

        arena.clear();

        assert_eq!(arena.len(), 0);
        assert!(ids.iter().all(|&id| !arena.is_occupied(id)));
        assert!(arena.allocate(9, None).is_ok());
    }
}
