// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types returned by [`OrderedIndex`](crate::OrderedIndex) operations and validation.

use thiserror::Error;

/// Failures reported by index construction and mutation.
///
/// [`DuplicateKey`](Error::DuplicateKey) and [`KeyNotFound`](Error::KeyNotFound) are
/// expected outcomes; the index is left exactly as it was before the call.
/// [`OutOfMemory`](Error::OutOfMemory) is also reported without partial mutation,
/// and the caller decides whether it is fatal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum Error {
    /// Insert of a key that is already present.
    #[error("key is already present in the index")]
    DuplicateKey,
    /// Remove of a key that is not present.
    #[error("key not found in the index")]
    KeyNotFound,
    /// Node storage could not grow, either because allocation failed or because
    /// the configured node budget is exhausted.
    #[error("out of memory: no room for another node")]
    OutOfMemory,
    /// [`IndexBuilder::build`](crate::IndexBuilder::build) was called without a comparator.
    #[error("no comparator supplied at construction")]
    InvalidComparator,
}

/// A broken structural invariant found by [`OrderedIndex::validate`](crate::OrderedIndex::validate).
///
/// Slots refer to positions in the node arena at the time of the check.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum InvariantViolation {
    /// A key is not strictly between the bounds imposed by its ancestors.
    #[error("node at slot {slot} violates search order")]
    Unordered {
        /// Arena slot of the offending node.
        slot: usize,
    },
    /// Subtree heights differ by more than one.
    #[error("node at slot {slot} is unbalanced (left {left}, right {right})")]
    Unbalanced {
        /// Arena slot of the offending node.
        slot: usize,
        /// Height of the left subtree.
        left: u32,
        /// Height of the right subtree.
        right: u32,
    },
    /// The cached height does not match the subtree.
    #[error("node at slot {slot} caches height {cached}, actual {actual}")]
    StaleHeight {
        /// Arena slot of the offending node.
        slot: usize,
        /// Height stored in the node.
        cached: u32,
        /// Height recomputed from the children.
        actual: u32,
    },
    /// The number of reachable nodes differs from the stored count.
    #[error("{reachable} nodes reachable from root, {stored} stored")]
    CountMismatch {
        /// Nodes reached by walking from the root.
        reachable: usize,
        /// Nodes held in the arena.
        stored: usize,
    },
}
