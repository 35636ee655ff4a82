//! Stack used for in-order traversal that records a path through the tree.

use allocator_api2::alloc::Allocator;

use crate::Node;

/// Worst case number of levels in a tree.
///
/// With a minimum degree of at least 2, a tree with `h` levels below the
/// root holds at least `2^(h + 1) - 1` keys. The key count is a `usize`, so
/// the path from the root to a leaf never has more than `usize::BITS` nodes.
const MAX_HEIGHT: usize = usize::BITS as usize;

/// Path from the root to the node holding the next key of an in-order
/// traversal.
///
/// Each entry pairs a node with the position of the next key to yield from
/// it. For internal nodes this position also identifies the child currently
/// being traversed: `children[pos]` is either on the stack above the entry or
/// has been fully traversed already.
///
/// The path is stored inline, so creating a stack never allocates.
pub(crate) struct Stack<'a, K, const B: usize, A: Allocator> {
    entries: [(Option<&'a Node<K, B, A>>, usize); MAX_HEIGHT],
    len: usize,
}

impl<'a, K, const B: usize, A: Allocator> Stack<'a, K, B, A> {
    /// Creates a stack positioned before the first key of the subtree rooted
    /// at `root`.
    pub(crate) fn new(root: Option<&'a Node<K, B, A>>) -> Self {
        let mut stack = Self {
            entries: [(None, 0); MAX_HEIGHT],
            len: 0,
        };
        if let Some(root) = root {
            stack.push_leftmost(root);
        }
        stack
    }

    /// Pushes `node` and its first descendants on every level below it.
    fn push_leftmost(&mut self, mut node: &'a Node<K, B, A>) {
        loop {
            debug_assert!(self.len < MAX_HEIGHT, "tree deeper than its key count allows");
            self.entries[self.len] = (Some(node), 0);
            self.len += 1;
            match node.child(0) {
                Some(child) => node = child,
                None => return,
            }
        }
    }

    /// Returns the next key in ascending order and advances past it.
    pub(crate) fn next(&mut self) -> Option<&'a K> {
        loop {
            let top = self.len.checked_sub(1)?;
            let (node, pos) = &mut self.entries[top];
            let node = (*node).expect("stack entry below len is always set");
            if let Some(key) = node.keys.get(*pos) {
                *pos += 1;

                // The sub-tree after this key comes next.
                let next = *pos;
                if let Some(child) = node.child(next) {
                    self.push_leftmost(child);
                }
                return Some(key);
            }

            // This node is exhausted, go back up to its parent.
            self.len = top;
        }
    }
}

impl<K, const B: usize, A: Allocator> Clone for Stack<'_, K, B, A> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            entries: self.entries,
            len: self.len,
        }
    }
}
