//! Level-by-level rendering of a tree, for debugging.

use core::fmt::{self, Display, Write};

use allocator_api2::{
    alloc::{Allocator, Global},
    vec::Vec,
};

use crate::Node;

/// Renders a [`BTree`](crate::BTree) one level per line, root first.
///
/// Each node is written as its keys separated by `|` inside brackets, and
/// nodes on the same level are separated by a space. A 2-4 tree holding
/// `1..=7` renders as:
///
/// ```text
/// [2|4]
/// [1] [3] [5|6|7]
/// ```
///
/// An empty tree renders as nothing. Created by
/// [`BTree::levels`](crate::BTree::levels).
pub struct Levels<'a, K, const B: usize = 6, A: Allocator = Global> {
    root: Option<&'a Node<K, B, A>>,
}

impl<'a, K, const B: usize, A: Allocator> Levels<'a, K, B, A> {
    #[inline]
    pub(crate) fn new(root: Option<&'a Node<K, B, A>>) -> Self {
        Self { root }
    }
}

impl<K: Display, const B: usize, A: Allocator> Display for Levels<'_, K, B, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.root else {
            return Ok(());
        };

        let mut level = Vec::new();
        level.push(root);
        while !level.is_empty() {
            for (i, node) in level.iter().enumerate() {
                if i != 0 {
                    f.write_char(' ')?;
                }
                write_node(node, f)?;
            }
            f.write_char('\n')?;

            let mut next = Vec::new();
            for node in &level {
                next.extend(node.children());
            }
            level = next;
        }
        Ok(())
    }
}

fn write_node<K: Display, const B: usize, A: Allocator>(
    node: &Node<K, B, A>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    f.write_char('[')?;
    for (i, key) in node.keys().iter().enumerate() {
        if i != 0 {
            f.write_char('|')?;
        }
        write!(f, "{key}")?;
    }
    f.write_char(']')
}

impl<K: fmt::Debug, const B: usize, A: Allocator> fmt::Debug for Node<K, B, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("keys", &self.keys())
            .field("leaf", &self.is_leaf())
            .finish()
    }
}
