//! Tree nodes and the structural primitives the tree driver composes.
//!
//! Every operation here follows the "fix-before-descend" discipline: a child
//! is split (on the insert path) or topped up by a borrow or merge (on the
//! remove path) *before* recursing into it. The recursion therefore always
//! lands on a node that can absorb one more key or lose one key without
//! breaking the occupancy invariant.

use core::{borrow::Borrow, mem};

use allocator_api2::{
    alloc::{Allocator, Global},
    boxed::Box,
    vec::Vec,
};

/// Owning handle to a child node.
pub(crate) type Edge<K, const B: usize, A> = Box<Node<K, B, A>, A>;

/// A single node of a [`BTree`](crate::BTree).
///
/// A node is a leaf if and only if it has no children. Internal nodes always
/// have exactly one more child than keys, and the keys of `children[i]` lie
/// between `keys[i - 1]` and `keys[i]`.
///
/// Nodes are only handed out by shared reference, through
/// [`BTree::search`](crate::BTree::search) and
/// [`BTree::for_all_nodes`](crate::BTree::for_all_nodes).
pub struct Node<K, const B: usize, A: Allocator = Global> {
    pub(crate) keys: Vec<K, A>,
    pub(crate) children: Vec<Edge<K, B, A>, A>,
}

impl<K, const B: usize, A: Allocator> Node<K, B, A> {
    /// Maximum number of keys in a node.
    pub const CAPACITY: usize = 2 * B - 1;

    /// Minimum number of keys in a non-root node.
    pub const MIN_KEYS: usize = B - 1;

    /// Returns the keys stored in this node, in order.
    #[inline]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Returns the number of keys stored in this node.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the node holds no keys.
    ///
    /// This is only ever observable transiently on the root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns `true` if this node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if the node holds the maximum of `2B - 1` keys.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.keys.len() == Self::CAPACITY
    }

    /// Returns the children of this node, left to right.
    #[inline]
    pub fn children(&self) -> impl ExactSizeIterator<Item = &Self> {
        self.children.iter().map(|child| &**child)
    }

    /// Returns the child at index `i`, if any.
    #[inline]
    pub fn child(&self, i: usize) -> Option<&Self> {
        self.children.get(i).map(|child| &**child)
    }

    /// Number of levels below this node. All leaves share the same depth so
    /// following the first child is enough.
    pub(crate) fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self;
        while let Some(child) = node.children.first() {
            node = &**child;
            depth += 1;
        }
        depth
    }

    /// Returns the leftmost key in this subtree.
    pub(crate) fn first_key(&self) -> Option<&K> {
        let mut node = self;
        while let Some(child) = node.children.first() {
            node = &**child;
        }
        node.keys.first()
    }

    /// Returns the rightmost key in this subtree by following the last child
    /// link down to a leaf.
    pub(crate) fn last_key(&self) -> Option<&K> {
        let mut node = self;
        while let Some(child) = node.children.last() {
            node = &**child;
        }
        node.keys.last()
    }

    /// Pre-order visit of every node in this subtree.
    pub(crate) fn for_all_nodes<F: FnMut(&Self)>(&self, visit: &mut F) {
        visit(self);
        for child in &self.children {
            child.for_all_nodes(visit);
        }
    }

    /// In-order visit of every key in this subtree.
    pub(crate) fn for_all<F: FnMut(&K)>(&self, visit: &mut F) {
        if self.is_leaf() {
            self.keys.iter().for_each(visit);
            return;
        }
        for (key, child) in self.keys.iter().zip(&self.children) {
            child.for_all(visit);
            visit(key);
        }

        // The last child has no key after it.
        if let Some(child) = self.children.last() {
            child.for_all(visit);
        }
    }

    /// Moves every key of the subtree rooted at `node` onto the end of `out`,
    /// in order, releasing the nodes as it goes.
    pub(crate) fn drain_into<A2: Allocator>(mut node: Edge<K, B, A>, out: &mut Vec<K, A2>) {
        // Borrow through a plain reference so both fields can be drained at
        // the same time.
        let node: &mut Self = &mut node;
        let mut children = node.children.drain(..);
        for key in node.keys.drain(..) {
            if let Some(child) = children.next() {
                Self::drain_into(child, out);
            }
            out.push(key);
        }
        if let Some(child) = children.next() {
            Self::drain_into(child, out);
        }
    }
}

impl<K, const B: usize, A: Allocator + Clone> Node<K, B, A> {
    /// Creates an empty node whose buffers are allocated at full capacity.
    ///
    /// Leaves never allocate a child buffer.
    pub(crate) fn new_in(alloc: &A, leaf: bool) -> Self {
        const { assert!(B >= 2, "the minimum degree of a B-tree must be at least 2") };
        let children = if leaf {
            Vec::new_in(alloc.clone())
        } else {
            Vec::with_capacity_in(Self::CAPACITY + 1, alloc.clone())
        };
        Self {
            keys: Vec::with_capacity_in(Self::CAPACITY, alloc.clone()),
            children,
        }
    }

    /// Allocates a leaf holding a single key.
    pub(crate) fn singleton_in(key: K, alloc: &A) -> Edge<K, B, A> {
        let mut node = Self::new_in(alloc, true);
        node.keys.push(key);
        Box::new_in(node, alloc.clone())
    }

    /// Allocates a keyless internal node whose only child is `child`.
    ///
    /// This is only used to grow the tree at the root and must be followed by
    /// a split of that child.
    pub(crate) fn grow_in(child: Edge<K, B, A>, alloc: &A) -> Edge<K, B, A> {
        let mut node = Self::new_in(alloc, false);
        node.children.push(child);
        Box::new_in(node, alloc.clone())
    }

    /// Splits the full child at index `i` around its median key, which is
    /// promoted into this node at position `i`.
    ///
    /// The full child keeps the lower `B - 1` keys (and lower `B` children)
    /// and a new right sibling receives the upper ones. Children are moved
    /// across, never copied.
    pub(crate) fn split_child(&mut self, i: usize, alloc: &A) {
        debug_assert!(!self.is_full(), "split into a full parent");
        let child = &mut self.children[i];
        debug_assert!(child.is_full(), "split of a non-full child");

        let mut right = Self::new_in(alloc, child.is_leaf());
        right.keys.extend(child.keys.drain(B..));
        if !child.is_leaf() {
            right.children.extend(child.children.drain(B..));
        }

        // The child now holds keys `[0, B - 1]`, the last of which is the
        // median.
        let median = child.keys.remove(B - 1);
        log::trace!(
            "split child {i}: {} + 1 + {} keys",
            child.keys.len(),
            right.keys.len()
        );

        self.keys.insert(i, median);
        self.children.insert(i + 1, Box::new_in(right, alloc.clone()));
    }

    /// Rotates the last key of `children[i - 1]` through the separator at
    /// `i - 1` into the front of `children[i]`.
    ///
    /// If the nodes are internal the sibling's last child moves across too.
    pub(crate) fn borrow_from_left(&mut self, i: usize) {
        let (head, tail) = self.children.split_at_mut(i);
        let sibling = &mut head[i - 1];
        let child = &mut tail[0];
        debug_assert!(sibling.len() >= B, "borrow from a minimal left sibling");

        let stolen = sibling.keys.pop().expect("left sibling has keys to lend");
        let separator = mem::replace(&mut self.keys[i - 1], stolen);
        child.keys.insert(0, separator);
        if let Some(edge) = sibling.children.pop() {
            child.children.insert(0, edge);
        }
        log::trace!("borrow into child {i} from its left sibling");
    }

    /// Rotates the first key of `children[i + 1]` through the separator at
    /// `i` onto the end of `children[i]`.
    ///
    /// If the nodes are internal the sibling's first child moves across too.
    pub(crate) fn borrow_from_right(&mut self, i: usize) {
        let (head, tail) = self.children.split_at_mut(i + 1);
        let child = &mut head[i];
        let sibling = &mut tail[0];
        debug_assert!(sibling.len() >= B, "borrow from a minimal right sibling");

        let stolen = sibling.keys.remove(0);
        let separator = mem::replace(&mut self.keys[i], stolen);
        child.keys.push(separator);
        if !sibling.is_leaf() {
            child.children.push(sibling.children.remove(0));
        }
        log::trace!("borrow into child {i} from its right sibling");
    }

    /// Merges `children[i + 1]` and the separator `keys[i]` into
    /// `children[i]`, producing an exactly full node.
    ///
    /// This node loses one key and one child. It is the only operation that
    /// can leave a node keyless, which only happens to the root.
    pub(crate) fn merge_children(&mut self, i: usize) {
        let mut sibling = self.children.remove(i + 1);
        let separator = self.keys.remove(i);
        let child = &mut self.children[i];
        debug_assert_eq!(child.len(), Self::MIN_KEYS, "merge of a non-minimal child");
        debug_assert_eq!(sibling.len(), Self::MIN_KEYS, "merge of a non-minimal sibling");

        child.keys.push(separator);
        child.keys.append(&mut sibling.keys);
        child.children.append(&mut sibling.children);
        debug_assert!(child.is_full());
        log::trace!("merge children {i} and {}", i + 1);
    }

    /// Ensures `children[i]` holds more than the minimum number of keys so
    /// that a removal can descend into it, and returns the index of the child
    /// to descend into.
    ///
    /// Borrowing prefers the left sibling over the right one. If neither can
    /// lend, the child is merged with its right sibling, or with its left one
    /// if it is the last child, in which case the returned index moves left.
    fn fix_child(&mut self, i: usize) -> usize {
        if self.children[i].len() > Self::MIN_KEYS {
            return i;
        }
        let has_right = i + 1 < self.children.len();
        if i > 0 && self.children[i - 1].len() >= B {
            self.borrow_from_left(i);
            i
        } else if has_right && self.children[i + 1].len() >= B {
            self.borrow_from_right(i);
            i
        } else if has_right {
            self.merge_children(i);
            i
        } else {
            self.merge_children(i - 1);
            i - 1
        }
    }
}

impl<K: Ord, const B: usize, A: Allocator> Node<K, B, A> {
    /// Returns the smallest index `i` such that `key < keys[i]`, or the
    /// number of keys if there is none.
    ///
    /// For example, in a node holding `[3, 9, 13, 27]`:
    /// - `index_of(2) == 0`
    /// - `index_of(5) == 1`
    /// - `index_of(10) == 2`
    /// - `index_of(19) == 3`
    /// - `index_of(31) == 4`
    #[inline]
    pub fn index_of(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k <= key)
    }

    /// Returns the index of the first key that is not less than `key`.
    #[inline]
    pub(crate) fn lower_bound<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.keys.partition_point(|k| k.borrow() < key)
    }
}

impl<K: Ord, const B: usize, A: Allocator + Clone> Node<K, B, A> {
    /// Inserts `key` into the subtree rooted at this node, which must not be
    /// full. Equal keys end up adjacent to each other.
    pub(crate) fn insert(&mut self, key: K, alloc: &A) {
        debug_assert!(!self.is_full(), "insert into a full node");
        let mut i = self.index_of(&key);
        if self.is_leaf() {
            self.keys.insert(i, key);
            return;
        }

        // Split the target child first so that it has room for the key. The
        // promoted median now sits at `keys[i]` and decides which half to
        // descend into.
        if self.children[i].is_full() {
            self.split_child(i, alloc);
            if self.keys[i] <= key {
                i += 1;
            }
        }
        self.children[i].insert(key, alloc);
    }

    /// Removes one key equal to `key` from the subtree rooted at this node
    /// and returns it.
    ///
    /// Unless this node is the root it must hold at least `B` keys on entry,
    /// so that a leaf never drops below the minimum.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let i = self.lower_bound(key);
        let found = self.keys.get(i).is_some_and(|k| k.borrow() == key);

        if self.is_leaf() {
            return found.then(|| self.keys.remove(i));
        }

        if found {
            // Replace the key by its predecessor or successor if the subtree
            // on that side can spare one.
            if self.children[i].len() >= B {
                let predecessor = self.children[i].pop_last()?;
                return Some(mem::replace(&mut self.keys[i], predecessor));
            }
            if self.children[i + 1].len() >= B {
                let successor = self.children[i + 1].pop_first()?;
                return Some(mem::replace(&mut self.keys[i], successor));
            }

            // Both neighbours are minimal: pull the key down into their merge
            // and remove it from there.
            self.merge_children(i);
            return self.children[i].remove(key);
        }

        let i = self.fix_child(i);
        self.children[i].remove(key)
    }

    /// Removes and returns the leftmost key of this subtree.
    pub(crate) fn pop_first(&mut self) -> Option<K> {
        if self.is_leaf() {
            return (!self.keys.is_empty()).then(|| self.keys.remove(0));
        }
        let i = self.fix_child(0);
        self.children[i].pop_first()
    }

    /// Removes and returns the rightmost key of this subtree.
    pub(crate) fn pop_last(&mut self) -> Option<K> {
        if self.is_leaf() {
            return self.keys.pop();
        }
        let i = self.fix_child(self.children.len() - 1);
        self.children[i].pop_last()
    }
}

impl<K: Clone, const B: usize, A: Allocator + Clone> Node<K, B, A> {
    /// Deep copy of this subtree with the same shape.
    pub(crate) fn clone_subtree(&self, alloc: &A) -> Edge<K, B, A> {
        let mut node = Self::new_in(alloc, self.is_leaf());
        node.keys.extend(self.keys.iter().cloned());
        node.children
            .extend(self.children.iter().map(|child| child.clone_subtree(alloc)));
        Box::new_in(node, alloc.clone())
    }
}

#[cfg(feature = "internal_benches")]
mod benches {
    use allocator_api2::alloc::Global;
    use divan::{Bencher, black_box};

    use super::Node;

    fn full_leaf<const B: usize>() -> Node<u32, B, Global> {
        let mut node = Node::new_in(&Global, true);
        let capacity = Node::<u32, B, Global>::CAPACITY as u32;
        node.keys.extend((0..capacity).map(|k| k * 2));
        node
    }

    #[divan::bench(consts = [2, 6, 16, 64])]
    fn index_of<const B: usize>(bencher: Bencher) {
        let node = full_leaf::<B>();
        let end = 2 * Node::<u32, B, Global>::CAPACITY as u32;
        bencher.bench_local(|| {
            for key in 0..end {
                black_box(node.index_of(black_box(&key)));
            }
        });
    }

    #[divan::bench(consts = [2, 6, 16, 64])]
    fn lower_bound<const B: usize>(bencher: Bencher) {
        let node = full_leaf::<B>();
        let end = 2 * Node::<u32, B, Global>::CAPACITY as u32;
        bencher.bench_local(|| {
            for key in 0..end {
                black_box(node.lower_bound(black_box(&key)));
            }
        });
    }
}
