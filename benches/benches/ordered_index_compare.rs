// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::collections::BTreeMap;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use understory_ordered_index::{Order, OrderedIndex, Visit};

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

fn gen_random_keys(count: usize, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut keys: Vec<u64> = (0..count).map(|_| rng.random()).collect();
    keys.sort_unstable();
    keys.dedup();
    keys.shuffle(&mut rng);
    keys
}

fn gen_sequential_keys(count: usize) -> Vec<u64> {
    (0..count as u64).collect()
}

fn build_index(keys: &[u64]) -> OrderedIndex<u64, u64> {
    let mut idx = OrderedIndex::new();
    for &k in keys {
        let _ = idx.insert(k, k);
    }
    idx
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &SIZES {
        group.throughput(Throughput::Elements(n as u64));
        for (pattern, keys) in [
            ("random", gen_random_keys(n, 0xCAFE_F00D)),
            ("sequential", gen_sequential_keys(n)),
        ] {
            group.bench_function(format!("avl_{pattern}_n{n}"), |b| {
                b.iter_batched(
                    OrderedIndex::<u64, u64>::new,
                    |mut idx| {
                        for &k in &keys {
                            let _ = idx.insert(k, k);
                        }
                        black_box(idx.height());
                    },
                    BatchSize::LargeInput,
                );
            });
            group.bench_function(format!("btreemap_{pattern}_n{n}"), |b| {
                b.iter_batched(
                    BTreeMap::<u64, u64>::new,
                    |mut map| {
                        for &k in &keys {
                            map.insert(k, k);
                        }
                        black_box(map.len());
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }
    group.finish();
}

fn bench_find(c: &mut Criterion) {
    let mut group = c.benchmark_group("find");
    for &n in &SIZES {
        let keys = gen_random_keys(n, 0xBADC_0FFE);
        let mut probes = keys.clone();
        probes.shuffle(&mut StdRng::seed_from_u64(1));
        let idx = build_index(&keys);
        let map: BTreeMap<u64, u64> = keys.iter().map(|&k| (k, k)).collect();
        let mut sorted: Vec<(u64, u64)> = keys.iter().map(|&k| (k, k)).collect();
        sorted.sort_unstable();

        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_function(format!("avl_n{n}"), |b| {
            b.iter(|| {
                let hits = probes.iter().filter(|k| idx.find(*k).is_some()).count();
                black_box(hits);
            });
        });
        group.bench_function(format!("btreemap_n{n}"), |b| {
            b.iter(|| {
                let hits = probes.iter().filter(|k| map.get(*k).is_some()).count();
                black_box(hits);
            });
        });
        group.bench_function(format!("sorted_vec_n{n}"), |b| {
            b.iter(|| {
                let hits = probes
                    .iter()
                    .filter(|k| sorted.binary_search_by_key(*k, |(key, _)| *key).is_ok())
                    .count();
                black_box(hits);
            });
        });
    }
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");
    for &n in &SIZES[..2] {
        let keys = gen_random_keys(n, 0xFACE_FEED);
        let mut order = keys.clone();
        order.shuffle(&mut StdRng::seed_from_u64(2));
        group.throughput(Throughput::Elements(order.len() as u64));
        group.bench_function(format!("avl_remove_all_n{n}"), |b| {
            b.iter_batched(
                || build_index(&keys),
                |mut idx| {
                    for k in &order {
                        let _ = idx.remove(k);
                    }
                    black_box(idx.is_empty());
                },
                BatchSize::LargeInput,
            );
        });
        group.bench_function(format!("btreemap_remove_all_n{n}"), |b| {
            b.iter_batched(
                || keys.iter().map(|&k| (k, k)).collect::<BTreeMap<u64, u64>>(),
                |mut map| {
                    for k in &order {
                        map.remove(k);
                    }
                    black_box(map.is_empty());
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_traverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("traverse");
    let n = 100_000;
    let idx = build_index(&gen_random_keys(n, 0xDEAD_BEEF));
    group.throughput(Throughput::Elements(idx.len() as u64));
    group.bench_function("visitor_full", |b| {
        b.iter(|| {
            let mut sum = 0_u64;
            let _ = idx.traverse(Order::Ascending, |_: &u64, r: &u64| {
                sum = sum.wrapping_add(*r);
                Visit::Continue
            });
            black_box(sum);
        });
    });
    group.bench_function("iter_full", |b| {
        b.iter(|| {
            let sum = idx.iter().fold(0_u64, |acc, (_, r)| acc.wrapping_add(*r));
            black_box(sum);
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_find,
    bench_remove,
    bench_traverse,
);
criterion_main!(benches);
