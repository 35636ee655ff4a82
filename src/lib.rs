//! This crate provides [`BTree`], a classic multiway B-tree holding an
//! ordered set of keys.
//!
//! ```
//! use mwtree::BTree;
//!
//! // A 2-4 tree: every node holds between 1 and 3 keys.
//! let mut tree: BTree<u32, 2> = BTree::new();
//! for key in 1..=7 {
//!     assert!(tree.insert(key));
//! }
//! assert_eq!(tree.depth(), Some(1));
//!
//! assert!(tree.remove(&4));
//! assert!(!tree.remove(&4));
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 5, 6, 7]);
//! ```

#![cfg_attr(not(any(test, feature = "internal_benches")), no_std)]
#![warn(missing_docs)]

use core::{
    borrow::Borrow,
    fmt::{self, Debug},
};

use allocator_api2::{
    alloc::{Allocator, Global},
    vec::Vec,
};
use node::Edge;

mod check;
mod format;
mod iter;
mod node;
mod stack;

pub use format::Levels;
pub use iter::*;
pub use node::Node;

/// An ordered set of keys based on a [B-tree].
///
/// The tree is parameterized by its minimum degree `B` (at least 2, checked
/// at compile time):
/// - Every node except the root holds between `B - 1` and `2B - 1` keys.
/// - Internal nodes have one more child than keys.
/// - All leaves are at the same depth.
///
/// Mutations follow the classic single-pass algorithms: full nodes are split
/// on the way down during insertion, and minimal nodes are topped up by
/// borrowing from or merging with a sibling on the way down during removal.
/// The height of the tree only ever changes at the root.
///
/// [`BTree::insert`] rejects keys that are already present, while
/// [`BTree::insert_multi`] admits them, which allows the tree to be used as a
/// multiset.
///
/// [B-tree]: https://en.wikipedia.org/wiki/B-tree
pub struct BTree<K, const B: usize = 6, A: Allocator = Global> {
    root: Option<Edge<K, B, A>>,
    len: usize,
    alloc: A,
}

impl<K, const B: usize> BTree<K, B, Global> {
    /// Creates a new, empty [`BTree`].
    ///
    /// This does not allocate until the first key is inserted.
    #[inline]
    pub fn new() -> Self {
        Self::new_in(Global)
    }
}

impl<K, const B: usize, A: Allocator + Clone> BTree<K, B, A> {
    /// Creates a new, empty [`BTree`] whose nodes are allocated with the
    /// given allocator.
    #[inline]
    pub fn new_in(alloc: A) -> Self {
        Self {
            root: None,
            len: 0,
            alloc,
        }
    }

    /// Returns the number of keys in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree contains no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Clears the tree, releasing all of its nodes.
    #[inline]
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Returns the root node, or `None` if the tree is empty.
    #[inline]
    pub fn root(&self) -> Option<&Node<K, B, A>> {
        self.root.as_deref()
    }

    /// Returns the number of levels below the root: `0` if the root is a
    /// leaf, or `None` if the tree is empty.
    #[inline]
    pub fn depth(&self) -> Option<usize> {
        self.root.as_ref().map(|root| root.depth())
    }

    /// Returns the smallest key in the tree.
    #[inline]
    pub fn first(&self) -> Option<&K> {
        self.root.as_ref()?.first_key()
    }

    /// Returns the rightmost (largest) key in the tree.
    ///
    /// This follows the last child link of every node down to a leaf.
    #[inline]
    pub fn last(&self) -> Option<&K> {
        self.root.as_ref()?.last_key()
    }

    /// Calls `visit` once for every key, in ascending order.
    pub fn for_all<F: FnMut(&K)>(&self, mut visit: F) {
        if let Some(root) = &self.root {
            root.for_all(&mut visit);
        }
    }

    /// Calls `visit` once for every node, parents before their children.
    ///
    /// The sum of [`Node::len`] over all visited nodes equals [`BTree::len`].
    pub fn for_all_nodes<F: FnMut(&Node<K, B, A>)>(&self, mut visit: F) {
        if let Some(root) = &self.root {
            root.for_all_nodes(&mut visit);
        }
    }

    /// Returns an iterator over the keys of the tree, in ascending order.
    ///
    /// The iterator keeps its path through the tree inline and does not
    /// allocate.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, B, A> {
        Iter::new(self.root(), self.len)
    }

    /// Returns a value which renders the tree level by level, root first,
    /// with one line per level and every node written as `[k1|k2|...]`.
    #[inline]
    pub fn levels(&self) -> Levels<'_, K, B, A> {
        Levels::new(self.root())
    }

    /// Drops a keyless root, promoting its only child if it has one. This is
    /// the only way the tree loses height.
    fn shrink_root(&mut self) {
        if let Some(root) = &mut self.root
            && root.is_empty()
        {
            debug_assert!(root.children.len() <= 1);
            self.root = root.children.pop();
            log::debug!("root merged away, depth is now {:?}", self.depth());
        }
    }
}

impl<K: Ord, const B: usize, A: Allocator + Clone> BTree<K, B, A> {
    /// Inserts a key into the tree.
    ///
    /// Returns `false` and leaves the tree unchanged if an equal key is
    /// already present, `true` otherwise.
    #[inline]
    pub fn insert(&mut self, key: K) -> bool {
        if self.contains(&key) {
            return false;
        }
        self.insert_multi(key);
        true
    }

    /// Inserts a key into the tree even if equal keys are already present.
    ///
    /// Equal keys are stored next to each other, so iteration yields them
    /// consecutively. [`BTree::remove`] removes them one at a time.
    pub fn insert_multi(&mut self, key: K) {
        let Some(mut root) = self.root.take() else {
            self.root = Some(Node::singleton_in(key, &self.alloc));
            self.len = 1;
            self.after_mutation();
            return;
        };

        // A full root can't absorb a promoted median, so give it a new parent
        // and split it first. This is the only way the tree gains height.
        if root.is_full() {
            root = Node::grow_in(root, &self.alloc);
            root.split_child(0, &self.alloc);
            log::debug!("root split, depth is now {}", root.depth());
        }
        root.insert(key, &self.alloc);
        self.root = Some(root);
        self.len += 1;
        self.after_mutation();
    }

    /// Removes a key from the tree. Returns whether the key was present.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.take(key).is_some()
    }

    /// Removes a key from the tree and returns it, if it was present.
    pub fn take<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let removed = self.root.as_mut()?.remove(key);

        // Rebalancing on the way down may have merged the root's last two
        // children even if the key turned out to be absent.
        self.shrink_root();
        if removed.is_some() {
            self.len -= 1;
        }
        self.after_mutation();
        removed
    }

    /// Removes and returns the smallest key in the tree.
    pub fn pop_first(&mut self) -> Option<K> {
        let removed = self.root.as_mut()?.pop_first();
        self.shrink_root();
        if removed.is_some() {
            self.len -= 1;
        }
        self.after_mutation();
        removed
    }

    /// Removes and returns the largest key in the tree.
    pub fn pop_last(&mut self) -> Option<K> {
        let removed = self.root.as_mut()?.pop_last();
        self.shrink_root();
        if removed.is_some() {
            self.len -= 1;
        }
        self.after_mutation();
        removed
    }

    /// Searches for a key, returning the node holding it and its position
    /// within that node's keys.
    ///
    /// If the tree holds several equal keys, the one highest in the tree is
    /// returned.
    pub fn search<Q>(&self, key: &Q) -> Option<(&Node<K, B, A>, usize)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root()?;
        loop {
            let pos = node.lower_bound(key);
            if node.keys.get(pos).is_some_and(|k| k.borrow() == key) {
                return Some((node, pos));
            }

            // Leaves have no children, which ends the search.
            node = node.child(pos)?;
        }
    }

    /// Returns `true` if the tree contains a key equal to `key`.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).is_some()
    }

    /// Returns a reference to the stored key equal to `key`.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).map(|(node, pos)| &node.keys()[pos])
    }
}

impl<K, const B: usize, A: Default + Allocator + Clone> Default for BTree<K, B, A> {
    #[inline]
    fn default() -> Self {
        Self::new_in(Default::default())
    }
}

impl<K: Clone, const B: usize, A: Allocator + Clone> Clone for BTree<K, B, A> {
    /// Copies the tree node by node, preserving its shape.
    fn clone(&self) -> Self {
        Self {
            root: self.root.as_ref().map(|root| root.clone_subtree(&self.alloc)),
            len: self.len,
            alloc: self.alloc.clone(),
        }
    }
}

impl<K: Debug, const B: usize, A: Allocator + Clone> Debug for BTree<K, B, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, const B: usize, A: Allocator + Clone> PartialEq for BTree<K, B, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K: Eq, const B: usize, A: Allocator + Clone> Eq for BTree<K, B, A> {}

impl<K: Ord, const B: usize> FromIterator<K> for BTree<K, B> {
    #[inline]
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        let mut btree = BTree::new();
        btree.extend(iter);
        btree
    }
}

impl<K: Ord, const B: usize, A: Allocator + Clone> Extend<K> for BTree<K, B, A> {
    #[inline]
    fn extend<T: IntoIterator<Item = K>>(&mut self, iter: T) {
        iter.into_iter().for_each(|key| {
            self.insert(key);
        });
    }
}

impl<'a, K: Ord + Copy + 'a, const B: usize, A: Allocator + Clone> Extend<&'a K>
    for BTree<K, B, A>
{
    #[inline]
    fn extend<T: IntoIterator<Item = &'a K>>(&mut self, iter: T) {
        iter.into_iter().for_each(|&key| {
            self.insert(key);
        });
    }
}

impl<'a, K, const B: usize, A: Allocator + Clone> IntoIterator for &'a BTree<K, B, A> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, B, A>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, const B: usize, A: Allocator + Clone> IntoIterator for BTree<K, B, A> {
    type Item = K;
    type IntoIter = IntoIter<K, A>;

    /// Moves the keys out of the tree in ascending order.
    fn into_iter(mut self) -> Self::IntoIter {
        let mut keys = Vec::with_capacity_in(self.len, self.alloc.clone());
        if let Some(root) = self.root.take() {
            Node::drain_into(root, &mut keys);
        }
        IntoIter::new(keys)
    }
}
