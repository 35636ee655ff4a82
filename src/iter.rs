use core::iter::FusedIterator;

use allocator_api2::{
    alloc::{Allocator, Global},
    vec::{self, Vec},
};

use crate::{Node, stack::Stack};

/// An iterator over the keys of a [`BTree`](crate::BTree), in ascending order.
pub struct Iter<'a, K, const B: usize = 6, A: Allocator = Global> {
    stack: Stack<'a, K, B, A>,
    remaining: usize,
}

impl<'a, K, const B: usize, A: Allocator> Iter<'a, K, B, A> {
    #[inline]
    pub(crate) fn new(root: Option<&'a Node<K, B, A>>, len: usize) -> Self {
        Self {
            stack: Stack::new(root),
            remaining: len,
        }
    }
}

impl<'a, K, const B: usize, A: Allocator> Iterator for Iter<'a, K, B, A> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let key = self.stack.next()?;
        self.remaining -= 1;
        Some(key)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, const B: usize, A: Allocator> ExactSizeIterator for Iter<'_, K, B, A> {}

impl<K, const B: usize, A: Allocator> FusedIterator for Iter<'_, K, B, A> {}

impl<K, const B: usize, A: Allocator> Clone for Iter<'_, K, B, A> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

/// An owning iterator over the keys of a [`BTree`](crate::BTree), in ascending order.
///
/// The nodes of the tree are released when the iterator is created.
pub struct IntoIter<K, A: Allocator = Global> {
    keys: vec::IntoIter<K, A>,
}

impl<K, A: Allocator> IntoIter<K, A> {
    #[inline]
    pub(crate) fn new(keys: Vec<K, A>) -> Self {
        Self {
            keys: keys.into_iter(),
        }
    }
}

impl<K, A: Allocator> Iterator for IntoIter<K, A> {
    type Item = K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.keys.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<K, A: Allocator> DoubleEndedIterator for IntoIter<K, A> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.keys.next_back()
    }
}

impl<K, A: Allocator> ExactSizeIterator for IntoIter<K, A> {}

impl<K, A: Allocator> FusedIterator for IntoIter<K, A> {}
