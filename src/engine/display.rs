//! # Text Rendering
//!
//! Indented dump and one-line `Display` for trees of displayable values.

use std::fmt::{self, Write};

use super::tree::NTree;
use crate::core::NodeId;
use crate::ports::NodeStore;

impl<T: fmt::Display> NTree<T> {
    /// One node per line in pre-order, indented by depth
    ///
    /// ```text
    /// A
    ///   B
    ///     E
    /// ```
    pub fn dump(&self, indent: &str) -> String {
        let mut out = String::new();
        if let Some(root) = self.root_id() {
            let store = self.store();
            dump_nodes(&**store, indent, root, &mut out);
        }
        out
    }
}

fn dump_nodes<T: fmt::Display>(
    store: &dyn NodeStore<T>,
    indent: &str,
    root: NodeId,
    out: &mut String,
) {
    let mut stack = vec![(root, 0)];

    while let Some((id, depth)) = stack.pop() {
        let Some(node) = store.node(id) else {
            continue;
        };
        for _ in 0..depth {
            out.push_str(indent);
        }
        // Writing into a String cannot fail
        let _ = writeln!(out, "{}", node.value);

        stack.extend(node.children().iter().rev().map(|&child| (child, depth + 1)));
    }
}

/// Nested form; each frame is a node and the offset of its next child
fn write_nodes<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    store: &dyn NodeStore<T>,
    root: NodeId,
) -> fmt::Result {
    let Some(node) = store.node(root) else {
        return Ok(());
    };
    write!(f, "{}", node.value)?;

    let mut stack = vec![(root, 0)];
    while let Some(frame) = stack.last_mut() {
        let (id, next) = *frame;

        let Some(&child) = store.children(id).get(next) else {
            stack.pop();
            if next > 0 {
                f.write_char(']')?;
            }
            continue;
        };
        frame.1 += 1;

        f.write_str(if next == 0 { "[" } else { ", " })?;
        if let Some(node) = store.node(child) {
            write!(f, "{}", node.value)?;
        }
        stack.push((child, 0));
    }

    Ok(())
}

impl<T: fmt::Display> fmt::Display for NTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root_id() {
            Some(root) => write_nodes(f, &**self.store(), root),
            None => Ok(()),
        }
    }
}
