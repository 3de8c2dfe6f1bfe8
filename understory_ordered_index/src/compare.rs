// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key ordering used by [`OrderedIndex`](crate::OrderedIndex).
//!
//! A [`Comparator`] carries whatever context it needs in `self`, so a font cache can
//! order glyph keys by face first and a texture atlas can order by page without any
//! type erasure. Closures of the shape `Fn(&K, &K) -> Ordering` are comparators too.
//!
//! ## Contract
//!
//! The order must be a strict total order and must not change while any index holds
//! keys ordered by it. The index never re-validates this; an inconsistent comparator
//! breaks search order silently (see [`OrderedIndex::validate`](crate::OrderedIndex::validate)).

use core::cmp::Ordering;

/// A three-way total order over keys of type `K`.
pub trait Comparator<K: ?Sized> {
    /// Compare `a` with `b`.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The key type's own [`Ord`] implementation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<K: Ord + ?Sized> Comparator<K> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts another comparator.
///
/// Useful for indices that should enumerate largest-first without using
/// [`Order::Descending`](crate::Order::Descending) at every call site.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reversed<C>(pub C);

impl<K: ?Sized, C: Comparator<K>> Comparator<K> for Reversed<C> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_order_matches_ord() {
        assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
        assert_eq!(NaturalOrder.compare("b", "a"), Ordering::Greater);
        assert_eq!(NaturalOrder.compare(&7_u8, &7_u8), Ordering::Equal);
    }

    #[test]
    fn reversed_flips_everything_but_equal() {
        let c = Reversed(NaturalOrder);
        assert_eq!(c.compare(&1, &2), Ordering::Greater);
        assert_eq!(c.compare(&2, &1), Ordering::Less);
        assert_eq!(c.compare(&3, &3), Ordering::Equal);
    }

    #[test]
    fn closures_carry_their_context() {
        // Order by distance from a pivot captured by the closure.
        let pivot = 10_i32;
        let by_distance = move |a: &i32, b: &i32| (a - pivot).abs().cmp(&(b - pivot).abs());
        assert_eq!(by_distance.compare(&9, &13), Ordering::Less);
        assert_eq!(by_distance.compare(&12, &8), Ordering::Equal);
    }
}
