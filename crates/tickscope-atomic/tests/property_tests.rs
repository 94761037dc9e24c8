//! Property-based tests for tickscope-atomic.
//!
//! quickcheck covers the small-domain invariants; proptest drives the
//! interleaved push/transfer/release schedules.

use proptest::prelude::*;
use quickcheck_macros::quickcheck;
use tickscope_atomic::{IntervalStats, SpscRing};

#[quickcheck]
fn prop_ring_never_exceeds_capacity(capacity: u8, pushes: u16) -> bool {
    let capacity = usize::from(capacity % 32) + 1;
    let Ok(ring) = SpscRing::<u64>::with_capacity(capacity) else {
        return false;
    };

    for v in 0..u64::from(pushes % 256) {
        let _ = ring.try_push(v);
    }

    ring.len() <= capacity && ring.len() + ring.free_space() == capacity
}

#[quickcheck]
fn prop_published_plus_dropped_equals_attempts(capacity: u8, pushes: u8) -> bool {
    let capacity = usize::from(capacity % 16) + 1;
    let Ok(ring) = SpscRing::<u32>::with_capacity(capacity) else {
        return false;
    };

    for v in 0..u32::from(pushes) {
        let _ = ring.try_push(v);
    }

    let snapshot = ring.counters().snapshot();
    snapshot.published + snapshot.dropped == u64::from(pushes)
        && snapshot.published == u64::from(pushes).min(capacity as u64)
}

#[quickcheck]
fn prop_full_ring_keeps_oldest_values(pushes: u8) -> bool {
    let Ok(ring) = SpscRing::<u32>::with_capacity(8) else {
        return false;
    };
    for v in 0..u32::from(pushes) {
        let _ = ring.try_push(v);
    }

    let kept: Vec<u32> = ring.iter_ready().collect();
    let expected: Vec<u32> = (0..u32::from(pushes).min(8)).collect();
    kept == expected
}

#[quickcheck]
fn prop_stats_bounds_contain_mean(samples: Vec<u16>) -> bool {
    let mut stats = IntervalStats::new();
    for s in &samples {
        stats.record(f64::from(*s));
    }

    match (stats.min(), stats.max()) {
        (Some(min), Some(max)) => {
            let mean = stats.mean();
            min <= mean + 1e-9 && mean <= max + 1e-9 && stats.std_dev() >= 0.0
        }
        (None, None) => samples.is_empty(),
        _ => false,
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Push(u8),
    Transfer,
    Release(u8),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (1u8..6).prop_map(Step::Push),
        Just(Step::Transfer),
        (0u8..8).prop_map(Step::Release),
    ]
}

proptest! {
    #[test]
    fn prop_transfer_schedule_preserves_fifo(steps in prop::collection::vec(step_strategy(), 1..64)) {
        let ingest = SpscRing::<u64>::with_capacity(8).map_err(|e| TestCaseError::fail(e.to_string()))?;
        // Retention is sized so a transfer always fits after a release pass.
        let retained = SpscRing::<u64>::with_capacity(16).map_err(|e| TestCaseError::fail(e.to_string()))?;

        let mut next = 0u64;
        let mut model_ingest: std::collections::VecDeque<u64> = std::collections::VecDeque::new();
        let mut model_retained: std::collections::VecDeque<u64> = std::collections::VecDeque::new();

        for step in steps {
            match step {
                Step::Push(n) => {
                    for _ in 0..n {
                        if ring_push(&ingest, next) {
                            model_ingest.push_back(next);
                        }
                        next += 1;
                    }
                }
                Step::Transfer => {
                    if retained.free_space() >= ingest.len() {
                        let moved = ingest.transfer_to(&retained);
                        prop_assert_eq!(moved, model_ingest.len());
                        model_retained.extend(model_ingest.drain(..));
                    }
                }
                Step::Release(n) => {
                    let released = retained.finish_read(usize::from(n));
                    prop_assert_eq!(released, usize::from(n).min(model_retained.len()));
                    model_retained.drain(..released);
                }
            }

            let ingest_values: Vec<u64> = ingest.iter_ready().collect();
            let retained_values: Vec<u64> = retained.iter_ready().collect();
            prop_assert_eq!(ingest_values, model_ingest.iter().copied().collect::<Vec<_>>());
            prop_assert_eq!(retained_values, model_retained.iter().copied().collect::<Vec<_>>());
        }
    }

    #[test]
    fn prop_stats_variance_matches_two_pass(samples in prop::collection::vec(0.0f64..100.0, 1..200)) {
        let mut stats = IntervalStats::new();
        for s in &samples {
            stats.record(*s);
        }

        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

        prop_assert!((stats.mean() - mean).abs() < 1e-9);
        prop_assert!((stats.variance() - variance).abs() < 1e-6);
    }
}

fn ring_push(ring: &SpscRing<u64>, value: u64) -> bool {
    ring.try_push(value).is_ok()
}
