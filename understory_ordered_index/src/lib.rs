// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_ordered_index --heading-base-level=0

//! Understory Ordered Index: a height-balanced (AVL) ordered index.
//!
//! Understory Ordered Index is a reusable building block for lookup-heavy caches such as
//! glyph caches and texture-atlas tables.
//!
//! - Insert, find, and remove records by key in `O(log n)`.
//! - Keys are ordered by a caller-supplied [`Comparator`], so the key type needs no
//!   [`Ord`] implementation and the order may carry its own context.
//! - Walk records in ascending or descending order with a [`Visitor`] that can stop
//!   early, or lazily with [`OrderedIndex::iter`].
//!
//! Every operation leaves the tree balanced: sibling subtree heights differ by at most
//! one, so the height for `n` records never exceeds `1.4405 * log2(n + 2) - 0.3277`
//! (see [`max_height_for`]). An insertion performs at most one single or double
//! rotation; a removal may rotate at several ancestors.
//!
//! Nodes live in a dense arena addressed by index, so there are no raw pointers and
//! nothing to leak. The index owns its records; use a reference type for the record
//! parameter to index records owned elsewhere.
//!
//! # Example
//!
//! ```rust
//! use understory_ordered_index::{Error, Order, OrderedIndex, Visit};
//!
//! let mut idx: OrderedIndex<u32, &str> = OrderedIndex::new();
//! for (k, v) in [(5, "e"), (3, "c"), (8, "h"), (1, "a")] {
//!     idx.insert(k, v).unwrap();
//! }
//!
//! // Keys are unique; the first record stays.
//! assert_eq!(idx.insert(5, "again"), Err(Error::DuplicateKey));
//! assert_eq!(idx.find(&5), Some(&"e"));
//!
//! // Ordered walk with early exit.
//! let mut seen = Vec::new();
//! idx.traverse(Order::Ascending, |k: &u32, _: &&str| {
//!     seen.push(*k);
//!     if *k >= 3 { Visit::Stop } else { Visit::Continue }
//! });
//! assert_eq!(seen, [1, 3]);
//!
//! assert_eq!(idx.remove(&3), Ok("c"));
//! assert_eq!(idx.len(), 3);
//! ```
//!
//! Custom orders are plain closures or [`Comparator`] implementations:
//!
//! ```rust
//! use understory_ordered_index::OrderedIndex;
//!
//! // Order glyph keys by (font, glyph id).
//! let by_font_then_glyph = |a: &(u16, u32), b: &(u16, u32)| a.0.cmp(&b.0).then(a.1.cmp(&b.1));
//! let mut glyphs = OrderedIndex::with_comparator(by_font_then_glyph);
//! glyphs.insert((1, 65), "A").unwrap();
//! glyphs.insert((0, 66), "B").unwrap();
//! assert_eq!(glyphs.first(), Some((&(0, 66), &"B")));
//! ```
//!
//! ## Errors
//!
//! Expected misses are `Option`s ([`OrderedIndex::find`]). Mutations return [`Error`]:
//! duplicate keys, missing keys, and allocation failure (including an exhausted
//! [node budget](IndexBuilder::node_budget)) all leave the index unchanged.
//!
//! ## Threading
//!
//! There is no internal synchronization. Mutation takes `&mut self`; share an index
//! across threads behind your own lock.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod check;
pub mod compare;
pub mod error;
pub mod index;
pub mod iter;
mod node;
pub mod visit;

pub use check::max_height_for;
pub use compare::{Comparator, NaturalOrder, Reversed};
pub use error::{Error, InvariantViolation};
pub use index::{IndexBuilder, OrderedIndex};
pub use iter::Iter;
pub use visit::{Order, Visit, Visitor};
