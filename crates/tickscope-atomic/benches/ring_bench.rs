//! Benchmarks for the SPSC ring and interval statistics.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tickscope_atomic::{DEFAULT_RING_CAPACITY, IntervalStats, SpscRing};

fn bench_try_push_pop(c: &mut Criterion) {
    let Ok(ring) = SpscRing::<i64>::with_capacity(DEFAULT_RING_CAPACITY) else {
        return;
    };

    c.bench_function("ring_try_push_pop", |b| {
        b.iter(|| {
            let _ = ring.try_push(black_box(42));
            black_box(ring.pop());
        });
    });
}

fn bench_try_push_full(c: &mut Criterion) {
    let Ok(ring) = SpscRing::<i64>::with_capacity(1) else {
        return;
    };
    let _ = ring.try_push(0);

    c.bench_function("ring_try_push_full", |b| {
        b.iter(|| {
            black_box(ring.try_push(black_box(1)).is_err());
        });
    });
}

fn bench_transfer_frame(c: &mut Criterion) {
    let (Ok(ingest), Ok(retained)) = (
        SpscRing::<i64>::with_capacity(DEFAULT_RING_CAPACITY),
        SpscRing::<i64>::with_capacity(DEFAULT_RING_CAPACITY),
    ) else {
        return;
    };

    // One second of 1 kHz events per frame.
    c.bench_function("ring_transfer_1000", |b| {
        b.iter(|| {
            for tick in 0..1_000 {
                let _ = ingest.try_push(tick);
            }
            black_box(ingest.transfer_to(&retained));
            retained.clear();
        });
    });
}

fn bench_stats_record(c: &mut Criterion) {
    let mut stats = IntervalStats::new();

    c.bench_function("stats_record", |b| {
        b.iter(|| {
            stats.record(black_box(16.7));
        });
    });
}

criterion_group!(
    benches,
    bench_try_push_pop,
    bench_try_push_full,
    bench_transfer_frame,
    bench_stats_record
);
criterion_main!(benches);
