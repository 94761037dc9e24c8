//! Streaming interval statistics.
//!
//! [`IntervalStats`] accumulates inter-event intervals one sample at a time
//! using Welford's update, so the mean and variance stay accurate without
//! storing samples. The accumulator is `Copy` and never allocates; the
//! analysis pass rebuilds one from scratch every frame.

/// Streaming count/min/max/mean/stddev accumulator.
///
/// Units are whatever the caller records; `tickscope` records milliseconds.
///
/// # Example
///
/// ```rust
/// use tickscope_atomic::IntervalStats;
///
/// let mut stats = IntervalStats::new();
/// for interval_ms in [10.0, 10.0, 10.0] {
///     stats.record(interval_ms);
/// }
///
/// assert_eq!(stats.count(), 3);
/// assert_eq!(stats.min(), Some(10.0));
/// assert!(stats.std_dev() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalStats {
    count: u64,
    mean: f64,
    /// Sum of squared deviations from the running mean.
    m2: f64,
    min: f64,
    max: f64,
}

impl Default for IntervalStats {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalStats {
    /// Create an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Record one sample.
    #[inline]
    #[allow(
        clippy::cast_precision_loss,
        reason = "sample counts stay far below 2^52"
    )]
    pub fn record(&mut self, value: f64) {
        self.count = self.count.saturating_add(1);
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Number of samples recorded.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Smallest sample, or `None` if empty.
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    /// Largest sample, or `None` if empty.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }

    /// Arithmetic mean, 0.0 if empty.
    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance, 0.0 if empty.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        reason = "sample counts stay far below 2^52"
    )]
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        (self.m2 / self.count as f64).max(0.0)
    }

    /// Population standard deviation, 0.0 if empty.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Discard all samples.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Whether no samples have been recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}
