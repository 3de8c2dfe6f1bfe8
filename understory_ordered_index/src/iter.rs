// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazy ordered iteration.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;

use crate::node::{Arena, NodeIdx};
use crate::visit::Order;

/// Iterator over `(key, record)` pairs of an [`OrderedIndex`](crate::OrderedIndex).
///
/// Created by [`OrderedIndex::iter`](crate::OrderedIndex::iter) and
/// [`OrderedIndex::iter_ordered`](crate::OrderedIndex::iter_ordered). Holds a stack of
/// at most `height` pending nodes; calling `iter` again restarts from the first record.
pub struct Iter<'a, K, R> {
    arena: &'a Arena<K, R>,
    stack: Vec<NodeIdx>,
    order: Order,
    remaining: usize,
}

impl<K, R> Debug for Iter<'_, K, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iter")
            .field("order", &self.order)
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

impl<'a, K, R> Iter<'a, K, R> {
    pub(crate) fn new(arena: &'a Arena<K, R>, root: Option<NodeIdx>, order: Order) -> Self {
        let mut it = Self {
            arena,
            stack: Vec::new(),
            order,
            remaining: arena.len(),
        };
        it.descend(root);
        it
    }

    /// Push the path from `at` to the first node of its subtree in iteration order.
    fn descend(&mut self, mut at: Option<NodeIdx>) {
        while let Some(idx) = at {
            self.stack.push(idx);
            let node = self.arena.get(idx);
            at = match self.order {
                Order::Ascending => node.left,
                Order::Descending => node.right,
            };
        }
    }
}

impl<'a, K, R> Iterator for Iter<'a, K, R> {
    type Item = (&'a K, &'a R);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        let arena = self.arena;
        let node = arena.get(idx);
        self.descend(match self.order {
            Order::Ascending => node.right,
            Order::Descending => node.left,
        });
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, R> ExactSizeIterator for Iter<'_, K, R> {}

impl<K, R> FusedIterator for Iter<'_, K, R> {}
