// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural validation and the AVL height bound.

use core::cmp::Ordering;

use crate::compare::Comparator;
use crate::error::InvariantViolation;
use crate::index::OrderedIndex;
use crate::node::NodeIdx;

/// Greatest height an AVL tree holding `n` nodes can reach.
///
/// The sparsest tree of height `h` holds `N(h) = N(h - 1) + N(h - 2) + 1` nodes, with
/// `N(0) = 0` and `N(1) = 1`, so this is the largest `h` with `N(h) <= n`. It never
/// exceeds `1.4405 * log2(n + 2) - 0.3277`.
///
/// ```
/// use understory_ordered_index::max_height_for;
///
/// assert_eq!(max_height_for(0), 0);
/// assert_eq!(max_height_for(7), 4);
/// assert_eq!(max_height_for(12), 5);
/// ```
pub fn max_height_for(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let (mut height, mut sparse_prev, mut sparse) = (1_usize, 0_usize, 1_usize);
    loop {
        let Some(next) = sparse
            .checked_add(sparse_prev)
            .and_then(|s| s.checked_add(1))
        else {
            return height;
        };
        if next > n {
            return height;
        }
        sparse_prev = sparse;
        sparse = next;
        height += 1;
    }
}

impl<K, R, C: Comparator<K>> OrderedIndex<K, R, C> {
    /// Walk the whole tree and confirm its structural invariants: strict search order,
    /// balance factors within ±1, cached heights, and a reachable node count equal to
    /// [`len`](Self::len).
    ///
    /// Runs in `O(n)`. Intended for tests and debugging; a violation means the
    /// comparator broke its total-order contract.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let mut reachable = 0;
        self.check_subtree(self.root, None, None, &mut reachable)?;
        if reachable != self.len() {
            return Err(InvariantViolation::CountMismatch {
                reachable,
                stored: self.len(),
            });
        }
        Ok(())
    }

    fn check_subtree(
        &self,
        at: Option<NodeIdx>,
        lower: Option<&K>,
        upper: Option<&K>,
        reachable: &mut usize,
    ) -> Result<u32, InvariantViolation> {
        let Some(idx) = at else {
            return Ok(0);
        };
        *reachable += 1;
        if *reachable > self.len() {
            // Shared or cyclic links; stop before walking them forever.
            return Err(InvariantViolation::CountMismatch {
                reachable: *reachable,
                stored: self.len(),
            });
        }
        let node = self.arena.get(idx);
        let slot = idx.get();
        let above_lower =
            lower.is_none_or(|lo| self.comparator.compare(lo, &node.key) == Ordering::Less);
        let below_upper =
            upper.is_none_or(|hi| self.comparator.compare(&node.key, hi) == Ordering::Less);
        if !(above_lower && below_upper) {
            return Err(InvariantViolation::Unordered { slot });
        }
        let left = self.check_subtree(node.left, lower, Some(&node.key), reachable)?;
        let right = self.check_subtree(node.right, Some(&node.key), upper, reachable)?;
        if left.abs_diff(right) > 1 {
            return Err(InvariantViolation::Unbalanced { slot, left, right });
        }
        let actual = 1 + left.max(right);
        if node.height != actual {
            return Err(InvariantViolation::StaleHeight {
                slot,
                cached: node.height,
                actual,
            });
        }
        Ok(actual)
    }
}
