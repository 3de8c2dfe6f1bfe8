// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered index basics.
//!
//! Insert, look up, walk, and remove records; then build a reversed index with a budget.
//!
//! Run:
//! - `cargo run -p understory_examples --example ordered_index_basics`
//! - `RUST_LOG=trace cargo run -p understory_examples --example ordered_index_basics`

use understory_ordered_index::{
    Error, IndexBuilder, NaturalOrder, Order, OrderedIndex, Reversed, Visit, max_height_for,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Build an index keyed by u32
    let mut idx: OrderedIndex<u32, String> = OrderedIndex::new();
    for k in [5, 3, 8, 1, 4, 7, 9, 2, 6] {
        idx.insert(k, format!("record {k}")).unwrap();
    }
    println!(
        "len={} height={} (bound {})",
        idx.len(),
        idx.height(),
        max_height_for(idx.len())
    );

    // Duplicates are rejected and the original stays
    assert_eq!(idx.insert(5, "other".into()), Err(Error::DuplicateKey));
    println!("find(5) = {:?}", idx.find(&5));

    // Replace explicitly
    let old = idx.insert_or_replace(5, "record five".into()).unwrap();
    println!("replaced {old:?} -> {:?}", idx.find(&5));

    // Ascending walk that stops after the first three records
    let mut seen = Vec::new();
    idx.traverse(Order::Ascending, |k: &u32, _: &String| {
        seen.push(*k);
        if seen.len() == 3 { Visit::Stop } else { Visit::Continue }
    });
    println!("first three ascending: {seen:?}");

    // Lazy descending iteration
    let down: Vec<_> = idx.iter_ordered(Order::Descending).map(|(k, _)| *k).collect();
    println!("descending: {down:?}");

    // Remove a record with two children
    println!("remove(3) = {:?}", idx.remove(&3));
    println!("remove(3) again = {:?}", idx.remove(&3));
    idx.validate().unwrap();

    // Reversed order with a node budget
    let mut small = IndexBuilder::new()
        .comparator(Reversed(NaturalOrder))
        .node_budget(4)
        .build::<i32, ()>()
        .unwrap();
    for k in 0..6 {
        if let Err(e) = small.insert(k, ()) {
            println!("insert({k}) failed: {e}");
        }
    }
    let keys: Vec<_> = small.iter().map(|(k, _)| *k).collect();
    println!("reversed with budget 4: {keys:?}");
}
