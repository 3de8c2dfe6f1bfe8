// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visitor protocol for [`OrderedIndex::traverse`](crate::OrderedIndex::traverse).

/// Signal returned by a [`Visitor`] after each record.
///
/// New signals (for example skipping a subtree) may be added, so downstream
/// matches need a wildcard arm.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Visit {
    /// Keep walking.
    Continue,
    /// End the traversal now. No further records are visited.
    Stop,
}

impl Visit {
    /// True if this is [`Visit::Stop`].
    #[inline]
    pub const fn is_stop(self) -> bool {
        matches!(self, Self::Stop)
    }
}

/// Direction of an ordered walk.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Order {
    /// Smallest key first.
    #[default]
    Ascending,
    /// Largest key first.
    Descending,
}

/// Per-record callback used by ordered traversal.
///
/// Any `FnMut(&K, &R) -> Visit` is a visitor; implement the trait directly when the
/// visitor needs to be named or reused.
pub trait Visitor<K, R> {
    /// Visit one record and decide whether to continue.
    fn visit(&mut self, key: &K, record: &R) -> Visit;
}

impl<K, R, F> Visitor<K, R> for F
where
    F: FnMut(&K, &R) -> Visit,
{
    #[inline]
    fn visit(&mut self, key: &K, record: &R) -> Visit {
        self(key, record)
    }
}
