// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public [`OrderedIndex`] API: insertion, removal, lookup, and traversal.

use core::cmp::Ordering;
use core::fmt::Debug;

use crate::compare::{Comparator, NaturalOrder};
use crate::error::Error;
use crate::iter::Iter;
use crate::node::{Arena, Node, NodeIdx};
use crate::visit::{Order, Visit, Visitor};

/// A height-balanced (AVL) ordered index from keys `K` to records `R`.
///
/// Records are owned by the index. To index records owned elsewhere, use a reference
/// type for `R`; the borrow checker then keeps the records alive for as long as the
/// index holds them.
///
/// Keys are unique under the comparator `C`. [`insert`](Self::insert) rejects a key
/// that is already present; [`insert_or_replace`](Self::insert_or_replace) is the
/// explicit overwrite path.
///
/// Lookups, insertions, and removals are `O(log n)`: the height of an index holding
/// `n` records never exceeds [`max_height_for(n)`](crate::max_height_for).
#[derive(Clone)]
pub struct OrderedIndex<K, R, C = NaturalOrder> {
    pub(crate) arena: Arena<K, R>,
    pub(crate) root: Option<NodeIdx>,
    pub(crate) comparator: C,
    pub(crate) budget: Option<usize>,
}

impl<K, R, C> Debug for OrderedIndex<K, R, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OrderedIndex")
            .field("len", &self.arena.len())
            .field("height", &self.arena.height(self.root))
            .field("node_budget", &self.node_budget())
            .field("arena", &self.arena)
            .finish_non_exhaustive()
    }
}

/// Result of inserting below some node: the repaired subtree root, the new node, and
/// whether the subtree grew taller.
#[derive(Copy, Clone, Debug)]
struct Grown {
    root: NodeIdx,
    inserted: NodeIdx,
    grew: bool,
}

impl<K: Ord, R> OrderedIndex<K, R> {
    /// Create an empty index ordered by `K`'s [`Ord`] implementation.
    pub const fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K: Ord, R> Default for OrderedIndex<K, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, R, C> OrderedIndex<K, R, C> {
    /// Create an empty index ordered by `comparator`.
    pub const fn with_comparator(comparator: C) -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            comparator,
            budget: None,
        }
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// True if the index holds no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree: 0 when empty, 1 for a single record.
    #[inline]
    pub fn height(&self) -> usize {
        self.arena.height(self.root) as usize
    }

    /// The comparator ordering this index.
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Maximum number of records, if a budget was configured.
    pub const fn node_budget(&self) -> Option<usize> {
        self.budget
    }

    /// Remove every record, keeping the comparator and configuration.
    pub fn clear(&mut self) {
        self.root = None;
        self.arena.nodes.clear();
    }

    /// Smallest key and its record.
    pub fn first(&self) -> Option<(&K, &R)> {
        self.entry_at(self.arena.extreme(self.root, Order::Ascending)?)
    }

    /// Largest key and its record.
    pub fn last(&self) -> Option<(&K, &R)> {
        self.entry_at(self.arena.extreme(self.root, Order::Descending)?)
    }

    /// Walk records in `order`, calling `visitor` for each until it returns [`Visit::Stop`].
    ///
    /// Returns [`Visit::Stop`] if the visitor ended the walk early and [`Visit::Continue`]
    /// if every record was visited. The walk never consults the comparator and does not
    /// allocate.
    pub fn traverse<V: Visitor<K, R>>(&self, order: Order, mut visitor: V) -> Visit {
        self.arena.walk(self.root, order, &mut visitor)
    }

    /// Iterate over `(key, record)` pairs in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, R> {
        self.iter_ordered(Order::Ascending)
    }

    /// Iterate over `(key, record)` pairs in the given order.
    pub fn iter_ordered(&self, order: Order) -> Iter<'_, K, R> {
        Iter::new(&self.arena, self.root, order)
    }

    fn entry_at(&self, idx: NodeIdx) -> Option<(&K, &R)> {
        let node = self.arena.get(idx);
        Some((&node.key, &node.record))
    }

    /// Make room for one more node, or fail without side effects.
    fn reserve_node(&mut self) -> Result<(), Error> {
        if let Some(budget) = self.budget.filter(|&b| self.arena.len() >= b) {
            tracing::debug!(budget, "insert rejected: node budget exhausted");
            return Err(Error::OutOfMemory);
        }
        self.arena.nodes.try_reserve(1).map_err(|_| {
            tracing::debug!(len = self.arena.len(), "insert rejected: allocation failed");
            Error::OutOfMemory
        })
    }
}

impl<K, R, C: Comparator<K>> OrderedIndex<K, R, C> {
    /// Insert `record` under `key`.
    ///
    /// Returns the stored record. Fails with [`Error::DuplicateKey`] if an equal key is
    /// present, or [`Error::OutOfMemory`] if no node can be allocated; in both cases the
    /// index is unchanged and `key` and `record` are dropped.
    ///
    /// At most one single or double rotation is performed.
    pub fn insert(&mut self, key: K, record: R) -> Result<&R, Error> {
        let grown = self.insert_at(self.root, key, record)?;
        self.root = Some(grown.root);
        Ok(&self.arena.get(grown.inserted).record)
    }

    /// Insert `record` under `key`, replacing and returning any record already stored
    /// under an equal key. The stored key is kept on replacement.
    pub fn insert_or_replace(&mut self, key: K, record: R) -> Result<Option<R>, Error> {
        if let Some(idx) = self.find_idx(&key) {
            let old = core::mem::replace(&mut self.arena.get_mut(idx).record, record);
            return Ok(Some(old));
        }
        self.insert(key, record).map(|_| None)
    }

    /// Look up the record stored under `key`.
    pub fn find(&self, key: &K) -> Option<&R> {
        self.find_idx(key).map(|idx| &self.arena.get(idx).record)
    }

    /// Look up the record stored under `key` for in-place modification.
    ///
    /// The key itself cannot be changed, so search order is preserved.
    pub fn find_mut(&mut self, key: &K) -> Option<&mut R> {
        let idx = self.find_idx(key)?;
        Some(&mut self.arena.get_mut(idx).record)
    }

    /// True if a record is stored under `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find_idx(key).is_some()
    }

    /// Remove the record stored under `key`.
    ///
    /// Fails with [`Error::KeyNotFound`] without modifying the index if `key` is absent.
    pub fn remove(&mut self, key: &K) -> Result<R, Error> {
        self.remove_entry(key).map(|(_, record)| record)
    }

    /// Remove and return the stored key and record for `key`.
    ///
    /// Every ancestor of the removed node is rebalanced, so more than one rotation may
    /// be performed.
    pub fn remove_entry(&mut self, key: &K) -> Result<(K, R), Error> {
        let (root, detached) = self.remove_at(self.root, key).inspect_err(|_| {
            tracing::debug!(len = self.arena.len(), "remove missed: key not found");
        })?;
        self.root = root;
        let node = self.release(detached);
        Ok((node.key, node.record))
    }

    fn find_idx(&self, key: &K) -> Option<NodeIdx> {
        let mut cur = self.root;
        while let Some(idx) = cur {
            let node = self.arena.get(idx);
            cur = match self.comparator.compare(key, &node.key) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(idx),
            };
        }
        None
    }

    /// Insert below `at`. Nothing is mutated until the new leaf exists, so every error
    /// leaves the tree untouched.
    fn insert_at(&mut self, at: Option<NodeIdx>, key: K, record: R) -> Result<Grown, Error> {
        let Some(idx) = at else {
            self.reserve_node()?;
            let leaf = self.arena.push_leaf(key, record);
            return Ok(Grown {
                root: leaf,
                inserted: leaf,
                grew: true,
            });
        };
        let node = self.arena.get(idx);
        let (left, right) = (node.left, node.right);
        let child = match self.comparator.compare(&key, &node.key) {
            Ordering::Equal => {
                tracing::debug!(slot = idx.get(), "insert rejected: duplicate key");
                return Err(Error::DuplicateKey);
            }
            Ordering::Less => {
                let child = self.insert_at(left, key, record)?;
                self.arena.get_mut(idx).left = Some(child.root);
                child
            }
            Ordering::Greater => {
                let child = self.insert_at(right, key, record)?;
                self.arena.get_mut(idx).right = Some(child.root);
                child
            }
        };
        // Growth stops at the first ancestor that absorbs it; nothing above needs work.
        if !child.grew {
            return Ok(Grown { root: idx, ..child });
        }
        let before = self.arena.get(idx).height;
        let root = self.arena.rebalance(idx);
        // A rotation after insertion restores the subtree's previous height.
        let grew = root == idx && self.arena.get(idx).height > before;
        Ok(Grown {
            root,
            inserted: child.inserted,
            grew,
        })
    }

    /// Unlink the node holding `key` from the subtree at `at`.
    ///
    /// Returns the repaired subtree root and the detached node, which still holds the
    /// removed key and record. Fails before any mutation if `key` is absent.
    fn remove_at(
        &mut self,
        at: Option<NodeIdx>,
        key: &K,
    ) -> Result<(Option<NodeIdx>, NodeIdx), Error> {
        let Some(idx) = at else {
            return Err(Error::KeyNotFound);
        };
        let node = self.arena.get(idx);
        let (left, right) = (node.left, node.right);
        match self.comparator.compare(key, &node.key) {
            Ordering::Less => {
                let (sub, detached) = self.remove_at(left, key)?;
                self.arena.get_mut(idx).left = sub;
                Ok((Some(self.arena.rebalance(idx)), detached))
            }
            Ordering::Greater => {
                let (sub, detached) = self.remove_at(right, key)?;
                self.arena.get_mut(idx).right = sub;
                Ok((Some(self.arena.rebalance(idx)), detached))
            }
            Ordering::Equal => match (left, right) {
                (Some(_), Some(right)) => {
                    // Take over the in-order successor's payload; the successor's node is
                    // the one physically unlinked.
                    let (sub, successor) = self.arena.detach_min(right);
                    self.arena.get_mut(idx).right = sub;
                    self.arena.swap_payload(idx, successor);
                    Ok((Some(self.arena.rebalance(idx)), successor))
                }
                (child, None) | (None, child) => Ok((child, idx)),
            },
        }
    }

    /// Drop an unlinked node from the arena, moving the last node into its slot.
    fn release(&mut self, detached: NodeIdx) -> Node<K, R> {
        let last = NodeIdx::new(self.arena.len() - 1);
        if detached != last {
            self.relink(last, detached);
        }
        self.arena.nodes.swap_remove(detached.get())
    }

    /// Point the single link that refers to `from` at `to`.
    fn relink(&mut self, from: NodeIdx, to: NodeIdx) {
        tracing::trace!(from = from.get(), to = to.get(), "relocating node");
        if self.root == Some(from) {
            self.root = Some(to);
            return;
        }
        let Some((parent, is_left)) = self
            .parent_link(from)
            .or_else(|| self.scan_parent_link(from))
        else {
            tracing::warn!(slot = from.get(), "relocated node has no incoming link");
            return;
        };
        let parent = self.arena.get_mut(parent);
        if is_left {
            parent.left = Some(to);
        } else {
            parent.right = Some(to);
        }
    }

    /// Find the parent of a linked node by searching for its key.
    fn parent_link(&self, target: NodeIdx) -> Option<(NodeIdx, bool)> {
        let key = &self.arena.get(target).key;
        let mut cur = self.root;
        while let Some(idx) = cur {
            let node = self.arena.get(idx);
            let is_left = self.comparator.compare(key, &node.key) == Ordering::Less;
            let next = if is_left { node.left } else { node.right };
            if next == Some(target) {
                return Some((idx, is_left));
            }
            cur = next;
        }
        None
    }

    /// Linear fallback for [`parent_link`](Self::parent_link), used only if the
    /// comparator has become inconsistent with the stored order.
    fn scan_parent_link(&self, target: NodeIdx) -> Option<(NodeIdx, bool)> {
        self.arena
            .nodes
            .iter()
            .enumerate()
            .find_map(|(i, n)| match (n.left, n.right) {
                (Some(l), _) if l == target => Some((NodeIdx::new(i), true)),
                (_, Some(r)) if r == target => Some((NodeIdx::new(i), false)),
                _ => None,
            })
    }
}

impl<'a, K, R, C> IntoIterator for &'a OrderedIndex<K, R, C> {
    type Item = (&'a K, &'a R);
    type IntoIter = Iter<'a, K, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Configures and builds an [`OrderedIndex`].
///
/// Unlike [`OrderedIndex::with_comparator`], the comparator is optional until
/// [`build`](Self::build), which reports a missing one as
/// [`Error::InvalidComparator`].
///
/// ```
/// use understory_ordered_index::{Error, IndexBuilder, NaturalOrder, OrderedIndex};
///
/// let mut idx: OrderedIndex<u32, &str> = IndexBuilder::new()
///     .comparator(NaturalOrder)
///     .capacity(16)
///     .node_budget(2)
///     .build()
///     .unwrap();
/// idx.insert(1, "a").unwrap();
/// idx.insert(2, "b").unwrap();
/// assert_eq!(idx.insert(3, "c"), Err(Error::OutOfMemory));
/// ```
pub struct IndexBuilder<C> {
    comparator: Option<C>,
    capacity: usize,
    budget: Option<usize>,
}

impl<C> Debug for IndexBuilder<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IndexBuilder")
            .field("has_comparator", &self.comparator.is_some())
            .field("capacity", &self.capacity)
            .field("budget", &self.budget)
            .finish()
    }
}

impl<C> Default for IndexBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> IndexBuilder<C> {
    /// Start a builder with no comparator, no reserved capacity, and no budget.
    pub const fn new() -> Self {
        Self {
            comparator: None,
            capacity: 0,
            budget: None,
        }
    }

    /// Order keys with `comparator`.
    #[must_use]
    pub fn comparator(mut self, comparator: C) -> Self {
        self.comparator = Some(comparator);
        self
    }

    /// Reserve node storage for `capacity` records up front.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Cap the number of records. Inserts beyond the cap fail with [`Error::OutOfMemory`].
    #[must_use]
    pub fn node_budget(mut self, budget: usize) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Build the index.
    ///
    /// Fails with [`Error::InvalidComparator`] if no comparator was supplied, or with
    /// [`Error::OutOfMemory`] if the requested capacity cannot be reserved.
    pub fn build<K, R>(self) -> Result<OrderedIndex<K, R, C>, Error>
    where
        C: Comparator<K>,
    {
        let Some(comparator) = self.comparator else {
            tracing::debug!("index construction rejected: no comparator");
            return Err(Error::InvalidComparator);
        };
        let mut index = OrderedIndex::with_comparator(comparator);
        index.budget = self.budget;
        let capacity = self.budget.map_or(self.capacity, |b| self.capacity.min(b));
        index
            .arena
            .nodes
            .try_reserve_exact(capacity)
            .map_err(|_| Error::OutOfMemory)?;
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Reversed;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::Cell;

    fn keys<K: Copy, R, C>(idx: &OrderedIndex<K, R, C>) -> Vec<K> {
        idx.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn insert_find_remove_roundtrip() {
        let mut idx: OrderedIndex<u32, &str> = OrderedIndex::new();
        assert_eq!(idx.insert(2, "two"), Ok(&"two"));
        assert_eq!(idx.insert(1, "one"), Ok(&"one"));
        assert_eq!(idx.find(&2), Some(&"two"));
        assert!(idx.contains_key(&1));
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.remove(&2), Ok("two"));
        assert_eq!(idx.find(&2), None);
        assert!(!idx.contains_key(&2));
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.remove(&2), Err(Error::KeyNotFound));
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn insert_performs_at_most_one_rebalance() {
        let mut idx: OrderedIndex<u32, ()> = OrderedIndex::new();
        for k in 0..512 {
            let before = idx.arena.rebalances;
            idx.insert(k, ()).unwrap();
            assert!(
                idx.arena.rebalances - before <= 1,
                "insert of {k} rebalanced more than once"
            );
        }
        assert!(idx.validate().is_ok());
    }

    #[test]
    fn mixed_inserts_and_removes_rotate_at_most_once_per_insert() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let rng = core::cell::RefCell::new(StdRng::seed_from_u64(0x0a71));
        for round in 0..20 {
            let mut idx: OrderedIndex<u32, u32> = OrderedIndex::new();
            // Zig-zag prefix: alternating extremes force left-right and right-left shapes.
            let mut seeds = Vec::new();
            for i in 0..64_u32 {
                seeds.push(if i % 2 == 0 { 350 - i } else { 350 + i });
                seeds.push(if i % 2 == 0 { 100 + i / 2 } else { 600 - i / 2 });
            }
            let random = (0..1_000).map(|_| rng.borrow_mut().random_range(0..700_u32));
            for (step, key) in seeds.into_iter().chain(random).enumerate() {
                if step >= 128 && rng.borrow_mut().random_range(0..3) == 0 {
                    let _ = idx.remove(&key);
                } else {
                    let before = idx.arena.rebalances;
                    let _ = idx.insert(key, key);
                    assert!(
                        idx.arena.rebalances - before <= 1,
                        "round {round}: insert of {key} rebalanced more than once"
                    );
                }
                assert_eq!(idx.validate(), Ok(()));
                assert!(idx.height() <= crate::max_height_for(idx.len()));
            }
        }
    }

    #[test]
    fn double_rotations_count_once_on_insert() {
        let mut idx: OrderedIndex<u32, ()> = OrderedIndex::new();
        idx.insert(30, ()).unwrap();
        idx.insert(10, ()).unwrap();
        // Left-right shape at the root.
        idx.insert(20, ()).unwrap();
        assert_eq!(idx.arena.rebalances, 1);
        assert_eq!(keys(&idx), vec![10, 20, 30]);
        idx.insert(40, ()).unwrap();
        // Right-left shape below the root.
        idx.insert(35, ()).unwrap();
        assert_eq!(idx.arena.rebalances, 2);
        assert_eq!(keys(&idx), vec![10, 20, 30, 35, 40]);
        assert_eq!(idx.height(), 3);
        assert!(idx.validate().is_ok());
    }

    #[test]
    fn removal_rebalances_several_ancestors() {
        // A minimal (Fibonacci) AVL tree of height 5: every internal node leans left,
        // so removing the single right leaf of the root's right spine shortens every
        // subtree on the way up.
        let mut idx: OrderedIndex<u32, ()> = OrderedIndex::new();
        for k in [8, 5, 11, 3, 7, 10, 12, 2, 4, 6, 9, 1] {
            idx.insert(k, ()).unwrap();
        }
        assert_eq!(idx.height(), 5);
        assert!(idx.validate().is_ok());
        let before = idx.arena.rebalances;
        idx.remove(&12).unwrap();
        assert!(idx.validate().is_ok());
        assert!(
            idx.arena.rebalances - before >= 2,
            "expected rotations at more than one ancestor"
        );
        assert_eq!(keys(&idx), vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn relocation_keeps_every_key_reachable() {
        let mut idx: OrderedIndex<u32, u32> = OrderedIndex::new();
        for k in 0..64 {
            idx.insert(k, k * 2).unwrap();
        }
        // Remove early slots so the last arena nodes are moved repeatedly.
        for k in (0..64).step_by(3) {
            assert_eq!(idx.remove(&k), Ok(k * 2));
            assert!(idx.validate().is_ok());
        }
        for k in 0..64 {
            assert_eq!(idx.find(&k).copied(), (k % 3 != 0).then_some(k * 2));
        }
    }

    #[test]
    fn insert_or_replace_overwrites_explicitly() {
        let mut idx: OrderedIndex<u32, &str> = OrderedIndex::new();
        assert_eq!(idx.insert_or_replace(1, "a"), Ok(None));
        assert_eq!(idx.insert_or_replace(1, "b"), Ok(Some("a")));
        assert_eq!(idx.find(&1), Some(&"b"));
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn find_mut_edits_in_place() {
        let mut idx: OrderedIndex<u32, u32> = OrderedIndex::new();
        idx.insert(3, 30).unwrap();
        *idx.find_mut(&3).unwrap() += 1;
        assert_eq!(idx.find(&3), Some(&31));
        assert!(idx.find_mut(&4).is_none());
    }

    #[test]
    fn first_last_and_clear() {
        let mut idx: OrderedIndex<i32, ()> = OrderedIndex::new();
        assert!(idx.first().is_none());
        for k in [4, -2, 9, 0] {
            idx.insert(k, ()).unwrap();
        }
        assert_eq!(idx.first().map(|(k, _)| *k), Some(-2));
        assert_eq!(idx.last().map(|(k, _)| *k), Some(9));
        idx.clear();
        assert!(idx.is_empty());
        assert_eq!(idx.height(), 0);
        idx.insert(1, ()).unwrap();
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn custom_comparator_orders_records() {
        let mut idx = OrderedIndex::with_comparator(Reversed(NaturalOrder));
        for k in [1_u32, 5, 3] {
            idx.insert(k, ()).unwrap();
        }
        assert_eq!(keys(&idx), vec![5, 3, 1]);

        // Case-insensitive keys collide.
        fn fold(s: &str) -> impl Iterator<Item = u8> + '_ {
            s.bytes().map(|c| c.to_ascii_lowercase())
        }
        let mut names =
            OrderedIndex::with_comparator(|a: &&str, b: &&str| fold(a).cmp(fold(b)));
        names.insert("Mono", 1).unwrap();
        assert_eq!(names.insert("mono", 2), Err(Error::DuplicateKey));
        assert_eq!(names.find(&"MONO"), Some(&1));
    }

    #[test]
    fn traverse_stops_without_further_comparisons() {
        let calls = Cell::new(0_usize);
        let counting = |a: &u32, b: &u32| {
            calls.set(calls.get() + 1);
            a.cmp(b)
        };
        let mut idx = OrderedIndex::with_comparator(counting);
        for k in 0..32 {
            idx.insert(k, ()).unwrap();
        }
        calls.set(0);
        let mut seen = Vec::new();
        let outcome = idx.traverse(Order::Ascending, |k: &u32, _: &()| {
            seen.push(*k);
            if seen.len() == 5 { Visit::Stop } else { Visit::Continue }
        });
        assert_eq!(outcome, Visit::Stop);
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert_eq!(calls.get(), 0);

        let mut count = 0;
        let outcome = idx.traverse(Order::Descending, |_: &u32, _: &()| {
            count += 1;
            Visit::Continue
        });
        assert_eq!(outcome, Visit::Continue);
        assert_eq!(count, 32);
    }

    #[test]
    fn budget_rejects_without_mutation() {
        let mut idx: OrderedIndex<u32, u32> = IndexBuilder::new()
            .comparator(NaturalOrder)
            .node_budget(3)
            .build()
            .unwrap();
        for k in [2, 1, 3] {
            idx.insert(k, k).unwrap();
        }
        assert_eq!(idx.insert(4, 4), Err(Error::OutOfMemory));
        // Duplicates are detected before the budget is consulted.
        assert_eq!(idx.insert(2, 0), Err(Error::DuplicateKey));
        assert_eq!(keys(&idx), vec![1, 2, 3]);
        assert_eq!(idx.node_budget(), Some(3));
        idx.remove(&1).unwrap();
        assert!(idx.insert(4, 4).is_ok());
        assert!(idx.validate().is_ok());
    }

    #[test]
    fn largest_budget_is_still_reported() {
        let idx: OrderedIndex<u32, ()> = IndexBuilder::new()
            .comparator(NaturalOrder)
            .node_budget(usize::MAX)
            .capacity(4)
            .build()
            .unwrap();
        assert_eq!(idx.node_budget(), Some(usize::MAX));
        assert!(idx.arena.nodes.capacity() >= 4);
        let unbounded: OrderedIndex<u32, ()> = OrderedIndex::new();
        assert_eq!(unbounded.node_budget(), None);
    }

    #[test]
    fn builder_without_comparator_is_rejected() {
        let built = IndexBuilder::<NaturalOrder>::new().capacity(8).build::<u32, ()>();
        assert_eq!(built.err(), Some(Error::InvalidComparator));
    }

    #[test]
    fn builder_reserves_capacity() {
        let idx: OrderedIndex<u64, ()> = IndexBuilder::new()
            .comparator(NaturalOrder)
            .capacity(100)
            .build()
            .unwrap();
        assert!(idx.arena.nodes.capacity() >= 100);
        assert!(idx.is_empty());
        assert_eq!(idx.node_budget(), None);
    }
}
