//! Assertion macros for float-valued statistics, interval accumulators and
//! ordered sequences.

/// Assert that two floating-point values are within `tolerance`.
///
/// # Example
///
/// ```rust
/// use tickscope_test_helpers::assert_approx_eq;
///
/// assert_approx_eq!(10.0_f64, 10.0001, 0.001);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $tolerance:expr $(,)?) => {
        let left = $left;
        let right = $right;
        let tolerance = $tolerance;
        let diff = (left - right).abs();
        if diff > tolerance {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}`,\n  tolerance: `{:?}`",
                left, right, diff, tolerance
            );
        }
    };
    ($left:expr, $right:expr, $tolerance:expr, $($arg:tt)+) => {
        let left = $left;
        let right = $right;
        let tolerance = $tolerance;
        let diff = (left - right).abs();
        if diff > tolerance {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}`,\n  tolerance: `{:?}`: {}",
                left, right, diff, tolerance, format_args!($($arg)+)
            );
        }
    };
}

/// Assert that a collection is sorted in ascending order.
///
/// # Example
///
/// ```rust
/// use tickscope_test_helpers::assert_sorted;
///
/// assert_sorted!(&[1, 2, 2, 5]);
/// ```
#[macro_export]
macro_rules! assert_sorted {
    ($collection:expr $(,)?) => {
        let collection = $collection;
        let mut iter = collection.iter();
        if let Some(mut prev) = iter.next() {
            for (i, curr) in iter.enumerate() {
                if prev > curr {
                    panic!(
                        "assertion failed: collection is not sorted\n  first unsorted pair at index {}: {:?} > {:?}",
                        i, prev, curr
                    );
                }
                prev = curr;
            }
        }
    };
}

/// Assert the sample count, min, max and mean of an interval accumulator,
/// each float within `tol`.
///
/// Accepts any value with `count()`, `min()`/`max()` returning
/// `Option<f64>` and `mean()`. Empty statistics fail the assertion.
///
/// # Example
///
/// ```rust
/// use tickscope_test_helpers::assert_interval_stats;
///
/// struct Intervals;
/// impl Intervals {
///     fn count(&self) -> u64 { 2 }
///     fn min(&self) -> Option<f64> { Some(9.5) }
///     fn max(&self) -> Option<f64> { Some(10.5) }
///     fn mean(&self) -> f64 { 10.0 }
/// }
///
/// assert_interval_stats!(Intervals, count: 2, min: 9.5, max: 10.5, mean: 10.0, tol: 1e-9);
/// ```
#[macro_export]
macro_rules! assert_interval_stats {
    (
        $stats:expr,
        count: $count:expr,
        min: $min:expr,
        max: $max:expr,
        mean: $mean:expr,
        tol: $tol:expr $(,)?
    ) => {{
        let stats = &$stats;
        assert_eq!(stats.count(), $count, "interval sample count");
        match (stats.min(), stats.max()) {
            (Some(min), Some(max)) => {
                $crate::assert_approx_eq!(min, $min, $tol, "interval min");
                $crate::assert_approx_eq!(max, $max, $tol, "interval max");
            }
            (min, max) => panic!(
                "assertion failed: interval statistics are empty (min {:?}, max {:?})",
                min, max
            ),
        }
        $crate::assert_approx_eq!(stats.mean(), $mean, $tol, "interval mean");
    }};
}
