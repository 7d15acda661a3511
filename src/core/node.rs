//! # Node
//!
//! One stored tree element: payload plus parent and child links.

use super::NodeId;

/// A tree node as held by a store
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    /// The payload
    pub value: T,

    /// Owning node, `None` for the root
    pub(crate) parent: Option<NodeId>,

    /// Children in insertion order
    pub(crate) children: Vec<NodeId>,
}

impl<T> Node<T> {
    pub fn new(value: T, parent: Option<NodeId>) -> Self {
        Self {
            value,
            parent,
            children: Vec::new(),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_leaf() {
        let node = Node::new('a', None);
        assert!(node.is_leaf());
        assert_eq!(node.parent(), None);
        assert_eq!(*node.value(), 'a');
    }

    #[test]
    fn test_node_keeps_parent() {
        let parent = NodeId::new(0, 0);
        let node = Node::new(7, Some(parent));
        assert_eq!(node.parent(), Some(parent));
        assert!(node.children().is_empty());
    }
}
