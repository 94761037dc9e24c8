//! Synthetic tick sequences.
//!
//! Tests use a clock where 1000 ticks equal one millisecond, so a tick is a
//! microsecond and interval arithmetic stays readable.

/// Ticks per millisecond in fixture sequences.
pub const TICKS_PER_MS: i64 = 1_000;

/// Convert milliseconds to fixture ticks, rounding to the nearest tick.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    reason = "fixture values are small"
)]
pub fn ms_to_ticks(ms: f64) -> i64 {
    (ms * TICKS_PER_MS as f64).round() as i64
}

/// `count` ticks starting at `start`, `step` apart.
///
/// # Example
///
/// ```rust
/// use tickscope_test_helpers::fixtures::evenly_spaced;
///
/// assert_eq!(evenly_spaced(0, 10, 3), vec![0, 10, 20]);
/// ```
#[must_use]
pub fn evenly_spaced(start: i64, step: i64, count: usize) -> Vec<i64> {
    (0..count)
        .scan(start, |tick, _| {
            let current = *tick;
            *tick += step;
            Some(current)
        })
        .collect()
}

/// A nominal `period` grid starting at `start`, each tick displaced by the
/// matching entry of `offsets`.
///
/// # Example
///
/// ```rust
/// use tickscope_test_helpers::fixtures::jittered;
///
/// assert_eq!(jittered(0, 100, &[0, 5, -5]), vec![0, 105, 195]);
/// ```
#[must_use]
pub fn jittered(start: i64, period: i64, offsets: &[i64]) -> Vec<i64> {
    evenly_spaced(start, period, offsets.len())
        .into_iter()
        .zip(offsets)
        .map(|(tick, offset)| tick + offset)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evenly_spaced() {
        assert_eq!(evenly_spaced(5, 2, 4), vec![5, 7, 9, 11]);
        assert!(evenly_spaced(0, 1, 0).is_empty());
    }

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(10.0), 10_000);
        assert_eq!(ms_to_ticks(0.105), 105);
    }
}
