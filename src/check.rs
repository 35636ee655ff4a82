//! Structural validation of a tree.

use allocator_api2::alloc::Allocator;

use crate::{BTree, Node};

impl<K: Ord, const B: usize, A: Allocator + Clone> BTree<K, B, A> {
    /// Checks every structural invariant of the tree.
    ///
    /// This walks the whole tree and is intended for tests and fuzzing.
    ///
    /// # Panics
    ///
    /// Panics if:
    /// - a node other than the root holds fewer than `B - 1` keys, or any
    ///   node holds more than `2B - 1` keys,
    /// - the root holds no keys,
    /// - keys are out of order, within a node or relative to the separating
    ///   keys of its ancestors,
    /// - an internal node does not have exactly one more child than keys,
    /// - leaves occur at different depths,
    /// - the number of keys does not match [`BTree::len`].
    pub fn check_invariants(&self) {
        let Some(root) = self.root() else {
            assert_eq!(self.len, 0, "empty tree with a non-zero length");
            return;
        };
        assert!(!root.is_empty(), "keyless root");

        let mut leaf_depth = None;
        let count = check_node(root, true, 0, None, None, &mut leaf_depth);
        assert_eq!(count, self.len, "number of keys does not match the length");
        assert_eq!(leaf_depth, self.depth());
    }
}

/// Checks the subtree rooted at `node`, whose keys must all lie within
/// `[min, max]`, and returns the number of keys in it.
fn check_node<'a, K: Ord, const B: usize, A: Allocator>(
    node: &'a Node<K, B, A>,
    is_root: bool,
    depth: usize,
    min: Option<&'a K>,
    max: Option<&'a K>,
    leaf_depth: &mut Option<usize>,
) -> usize {
    let len = node.len();
    assert!(len <= Node::<K, B, A>::CAPACITY, "overfull node: {len} keys");

    // Non-root nodes must be at least half full.
    if !is_root {
        assert!(len >= Node::<K, B, A>::MIN_KEYS, "underfull node: {len} keys");
    }

    // Keys must be sorted, allowing for equal keys admitted by
    // `insert_multi`.
    assert!(node.keys().is_sorted(), "keys out of order");
    if let Some(min) = min {
        assert!(node.keys().iter().all(|key| key >= min), "key below its subtree bound");
    }
    if let Some(max) = max {
        assert!(node.keys().iter().all(|key| key <= max), "key above its subtree bound");
    }

    if node.is_leaf() {
        match *leaf_depth {
            Some(expected) => assert_eq!(depth, expected, "leaves at different depths"),
            None => *leaf_depth = Some(depth),
        }
        return len;
    }

    assert_eq!(node.children().len(), len + 1, "wrong number of children");
    let mut count = len;
    for (i, child) in node.children().enumerate() {
        let lower = match i.checked_sub(1) {
            Some(prev) => node.keys().get(prev),
            None => min,
        };
        let upper = node.keys().get(i).or(max);
        count += check_node(child, false, depth + 1, lower, upper, leaf_depth);
    }
    count
}

cfg_if::cfg_if! {
    if #[cfg(feature = "check_invariants")] {
        impl<K: Ord, const B: usize, A: Allocator + Clone> BTree<K, B, A> {
            /// Runs a full structural check after every mutation.
            #[inline]
            pub(crate) fn after_mutation(&self) {
                self.check_invariants();
            }
        }
    } else {
        impl<K: Ord, const B: usize, A: Allocator + Clone> BTree<K, B, A> {
            #[inline(always)]
            pub(crate) fn after_mutation(&self) {}
        }
    }
}
