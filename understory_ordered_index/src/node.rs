// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node arena: storage, cached heights, rotations, and rebalancing.
//!
//! Nodes live in a dense `Vec` and refer to their children by [`NodeIdx`]. Every index
//! is referenced by exactly one link (a parent's `left`/`right`, or the tree root), so
//! the links always form a tree. Nothing here consults the key order; the callers in
//! [`index`](crate::index) decide where to descend and hand subtrees back for repair.
//!
//! Heights use 0 for the empty subtree and 1 for a leaf.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::visit::{Order, Visit, Visitor};

/// Position of a node in the arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(usize);

impl NodeIdx {
    pub(crate) const fn new(i: usize) -> Self {
        Self(i)
    }

    pub(crate) const fn get(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K, R> {
    pub(crate) key: K,
    pub(crate) record: R,
    pub(crate) left: Option<NodeIdx>,
    pub(crate) right: Option<NodeIdx>,
    pub(crate) height: u32,
}

impl<K, R> Node<K, R> {
    const fn leaf(key: K, record: R) -> Self {
        Self {
            key,
            record,
            left: None,
            right: None,
            height: 1,
        }
    }
}

/// The four restructuring shapes. Named after the rotation applied at the
/// unbalanced node; the double shapes first rotate its heavy child.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Rotation {
    Left,
    Right,
    LeftRight,
    RightLeft,
}

#[derive(Clone)]
pub(crate) struct Arena<K, R> {
    pub(crate) nodes: Vec<Node<K, R>>,
    /// Rebalancing events (single or double rotations) since creation.
    pub(crate) rebalances: u64,
}

impl<K, R> Debug for Arena<K, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Arena")
            .field("nodes", &self.nodes.len())
            .field("capacity", &self.nodes.capacity())
            .field("rebalances", &self.rebalances)
            .finish_non_exhaustive()
    }
}

impl<K, R> Arena<K, R> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            rebalances: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn get(&self, idx: NodeIdx) -> &Node<K, R> {
        &self.nodes[idx.get()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, idx: NodeIdx) -> &mut Node<K, R> {
        &mut self.nodes[idx.get()]
    }

    /// Append a detached leaf. Callers reserve capacity first so this cannot reallocate
    /// after the insertion point has been chosen.
    pub(crate) fn push_leaf(&mut self, key: K, record: R) -> NodeIdx {
        let idx = NodeIdx::new(self.nodes.len());
        self.nodes.push(Node::leaf(key, record));
        idx
    }

    #[inline]
    pub(crate) fn height(&self, at: Option<NodeIdx>) -> u32 {
        at.map_or(0, |idx| self.get(idx).height)
    }

    /// `height(left) - height(right)`.
    pub(crate) fn balance(&self, idx: NodeIdx) -> i64 {
        let n = self.get(idx);
        i64::from(self.height(n.left)) - i64::from(self.height(n.right))
    }

    pub(crate) fn update_height(&mut self, idx: NodeIdx) {
        let n = self.get(idx);
        let h = 1 + self.height(n.left).max(self.height(n.right));
        self.get_mut(idx).height = h;
    }

    /// Lift the right child of `idx` into its place. Returns the new subtree root.
    fn rotate_left(&mut self, idx: NodeIdx) -> NodeIdx {
        let Some(pivot) = self.get(idx).right else {
            return idx;
        };
        let inner = self.get(pivot).left;
        self.get_mut(idx).right = inner;
        self.get_mut(pivot).left = Some(idx);
        self.update_height(idx);
        self.update_height(pivot);
        pivot
    }

    /// Lift the left child of `idx` into its place. Returns the new subtree root.
    fn rotate_right(&mut self, idx: NodeIdx) -> NodeIdx {
        let Some(pivot) = self.get(idx).left else {
            return idx;
        };
        let inner = self.get(pivot).right;
        self.get_mut(idx).left = inner;
        self.get_mut(pivot).right = Some(idx);
        self.update_height(idx);
        self.update_height(pivot);
        pivot
    }

    /// Refresh the cached height of `idx` and, if its balance factor has reached ±2,
    /// restore balance with one single or double rotation.
    ///
    /// Both children must already be balanced with correct heights. Returns the root
    /// of the repaired subtree, which the caller must store in the parent link.
    pub(crate) fn rebalance(&mut self, idx: NodeIdx) -> NodeIdx {
        self.update_height(idx);
        let balance = self.balance(idx);
        let (shape, root) = if balance > 1 {
            let Some(left) = self.get(idx).left else {
                return idx;
            };
            // A right-leaning left child would stay unbalanced after a single rotation.
            let shape = if self.balance(left) < 0 {
                let lifted = self.rotate_left(left);
                self.get_mut(idx).left = Some(lifted);
                Rotation::LeftRight
            } else {
                Rotation::Right
            };
            (shape, self.rotate_right(idx))
        } else if balance < -1 {
            let Some(right) = self.get(idx).right else {
                return idx;
            };
            let shape = if self.balance(right) > 0 {
                let lifted = self.rotate_right(right);
                self.get_mut(idx).right = Some(lifted);
                Rotation::RightLeft
            } else {
                Rotation::Left
            };
            (shape, self.rotate_left(idx))
        } else {
            return idx;
        };
        self.rebalances += 1;
        tracing::trace!(
            slot = idx.get(),
            new_root = root.get(),
            shape = ?shape,
            "rebalanced subtree"
        );
        root
    }

    /// Unlink the leftmost node of the subtree at `idx`, rebalancing on the way up.
    ///
    /// Returns the new subtree root and the detached node. The detached node keeps
    /// its payload and stays in the arena until the caller releases it.
    pub(crate) fn detach_min(&mut self, idx: NodeIdx) -> (Option<NodeIdx>, NodeIdx) {
        match self.get(idx).left {
            None => (self.get(idx).right, idx),
            Some(left) => {
                let (rest, min) = self.detach_min(left);
                self.get_mut(idx).left = rest;
                (Some(self.rebalance(idx)), min)
            }
        }
    }

    /// Exchange key and record between two distinct nodes, leaving links untouched.
    pub(crate) fn swap_payload(&mut self, a: NodeIdx, b: NodeIdx) {
        let (lo, hi) = if a.get() < b.get() {
            (a.get(), b.get())
        } else {
            (b.get(), a.get())
        };
        if lo == hi {
            return;
        }
        let (head, tail) = self.nodes.split_at_mut(hi);
        let (x, y) = (&mut head[lo], &mut tail[0]);
        core::mem::swap(&mut x.key, &mut y.key);
        core::mem::swap(&mut x.record, &mut y.record);
    }

    /// Extreme node of a subtree: leftmost for ascending, rightmost for descending.
    pub(crate) fn extreme(&self, at: Option<NodeIdx>, order: Order) -> Option<NodeIdx> {
        let mut cur = at?;
        loop {
            let next = match order {
                Order::Ascending => self.get(cur).left,
                Order::Descending => self.get(cur).right,
            };
            match next {
                Some(n) => cur = n,
                None => return Some(cur),
            }
        }
    }

    /// In-order walk. Recursion depth is bounded by the tree height.
    pub(crate) fn walk<V: Visitor<K, R>>(
        &self,
        at: Option<NodeIdx>,
        order: Order,
        visitor: &mut V,
    ) -> Visit {
        let Some(idx) = at else {
            return Visit::Continue;
        };
        let node = self.get(idx);
        let (first, second) = match order {
            Order::Ascending => (node.left, node.right),
            Order::Descending => (node.right, node.left),
        };
        if self.walk(first, order, visitor).is_stop() {
            return Visit::Stop;
        }
        if visitor.visit(&node.key, &node.record).is_stop() {
            return Visit::Stop;
        }
        self.walk(second, order, visitor)
    }
}
