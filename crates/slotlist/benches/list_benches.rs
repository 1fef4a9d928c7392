// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use slotlist::prelude::*;
use std::hint::black_box;

// -----------------------
// Problem size constants
// -----------------------
const NUM_VALUES: usize = 1_000;

fn unchecked() -> ListConfig {
    ListConfig::default().with_verify_on_mutation(false)
}

fn build_list(config: ListConfig) -> IndexedList {
    IndexedList::from_values(config, (0..NUM_VALUES as Value).map(|v| v * 3))
        .expect("building the bench list must succeed")
}

// Interleave front/back removes and middle inserts so live slots scatter.
fn build_scattered(config: ListConfig) -> IndexedList {
    let mut list = build_list(config);
    for i in 0..NUM_VALUES / 4 {
        let v = list.pop_front().expect("non-empty");
        let mid = list.len() / 2;
        list.insert(mid, v + i as Value).expect("mid insert");
    }
    list
}

// -----------------------
// 1) push_back until grown
// -----------------------
fn bench_push_back(c: &mut Criterion) {
    let mut group = c.benchmark_group("slotlist/push_back");
    for (label, config) in [("verified", ListConfig::default()), ("unchecked", unchecked())] {
        group.bench_function(label, |b| {
            b.iter(|| {
                let list = build_list(black_box(config));
                black_box(list.len())
            })
        });
    }
    group.finish();
}

// ---------------------------------------
// 2) insert + remove in the middle (O(n) walk)
// ---------------------------------------
fn bench_mid_insert_remove(c: &mut Criterion) {
    c.bench_function("slotlist/mid_insert_remove_unchecked", |b| {
        b.iter_batched_ref(
            || build_list(unchecked()),
            |list| {
                let mid = list.len() / 2;
                list.insert(black_box(mid), 7).expect("insert");
                black_box(list.remove(black_box(mid)).expect("remove"))
            },
            BatchSize::SmallInput,
        )
    });
}

// -----------------------
// 3) verify a full list
// -----------------------
fn bench_verify(c: &mut Criterion) {
    let list = build_scattered(unchecked());
    c.bench_function("slotlist/verify_scattered", |b| {
        b.iter(|| black_box(list.verify()))
    });
}

// ----------------------------------------
// 4) iterate scattered vs linearized slots
// ----------------------------------------
fn bench_iterate(c: &mut Criterion) {
    let scattered = build_scattered(unchecked());
    let mut linear = scattered.clone();
    linear.linearize().expect("linearize");

    let mut group = c.benchmark_group("slotlist/iterate");
    group.bench_function("scattered", |b| {
        b.iter(|| black_box(scattered.iter().sum::<Value>()))
    });
    group.bench_function("linearized", |b| {
        b.iter(|| black_box(linear.iter().sum::<Value>()))
    });
    group.finish();
}

// -----------------------
// 5) linearize
// -----------------------
fn bench_linearize(c: &mut Criterion) {
    c.bench_function("slotlist/linearize_scattered", |b| {
        b.iter_batched_ref(
            || build_scattered(unchecked()),
            |list| list.linearize().expect("linearize"),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_push_back,
    bench_mid_insert_remove,
    bench_verify,
    bench_iterate,
    bench_linearize
);
criterion_main!(benches);
