//! Atomic transport counters for ring diagnostics.
//!
//! Every [`SpscRing`](crate::SpscRing) owns a [`TransportCounters`] that
//! tracks how many values were published, dropped on a full ring, migrated
//! to another ring, truncated during migration and consumed.
//!
//! # RT Safety
//!
//! All `record_*` methods are a single relaxed `fetch_add`. The counters
//! carry no synchronization duty; the ring indices do that.

use core::sync::atomic::{AtomicU64, Ordering};

/// Counter snapshot returned by [`TransportCounters::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransportSnapshot {
    /// Values accepted into the ring
    pub published: u64,
    /// Values rejected because the ring was full
    pub dropped: u64,
    /// Values migrated out into another ring
    pub transferred: u64,
    /// Values discarded because the destination ring was full
    pub truncated: u64,
    /// Values released by the consumer without migration
    pub consumed: u64,
}

impl TransportSnapshot {
    /// Percentage of publish attempts that were dropped.
    ///
    /// Returns 0.0 when nothing has been attempted.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        reason = "counter ratios only need display precision"
    )]
    pub fn drop_rate_percent(&self) -> f64 {
        let attempts = self.published.saturating_add(self.dropped);
        if attempts == 0 {
            return 0.0;
        }
        (self.dropped as f64 / attempts as f64) * 100.0
    }
}

/// Atomic counters for one ring.
///
/// # Example
///
/// ```rust
/// use tickscope_atomic::TransportCounters;
///
/// let counters = TransportCounters::new();
/// counters.record_published();
/// counters.record_dropped();
///
/// let snapshot = counters.snapshot();
/// assert_eq!(snapshot.published, 1);
/// assert_eq!(snapshot.dropped, 1);
/// ```
#[derive(Debug)]
pub struct TransportCounters {
    published: AtomicU64,
    dropped: AtomicU64,
    transferred: AtomicU64,
    truncated: AtomicU64,
    consumed: AtomicU64,
}

impl Default for TransportCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportCounters {
    /// Create counters initialized to zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            published: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            transferred: AtomicU64::new(0),
            truncated: AtomicU64::new(0),
            consumed: AtomicU64::new(0),
        }
    }

    /// Count one accepted value.
    #[inline]
    pub fn record_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    /// Count `amount` accepted values (bulk migration into this ring).
    #[inline]
    pub fn record_published_by(&self, amount: u64) {
        self.published.fetch_add(amount, Ordering::Relaxed);
    }

    /// Count one value rejected on a full ring.
    #[inline]
    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Count values migrated out of this ring.
    #[inline]
    pub fn record_transferred(&self, amount: u64) {
        self.transferred.fetch_add(amount, Ordering::Relaxed);
    }

    /// Count values lost because the destination had no room.
    #[inline]
    pub fn record_truncated(&self, amount: u64) {
        self.truncated.fetch_add(amount, Ordering::Relaxed);
    }

    /// Count values released with [`SpscRing::finish_read`](crate::SpscRing::finish_read).
    #[inline]
    pub fn record_consumed(&self, amount: u64) {
        self.consumed.fetch_add(amount, Ordering::Relaxed);
    }

    /// Read all counters without resetting them.
    ///
    /// Loads are individually atomic; the snapshot as a whole is not.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> TransportSnapshot {
        TransportSnapshot {
            published: self.published.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            transferred: self.transferred.load(Ordering::Relaxed),
            truncated: self.truncated.load(Ordering::Relaxed),
            consumed: self.consumed.load(Ordering::Relaxed),
        }
    }

    /// Read all counters and reset them to zero.
    #[inline]
    #[must_use]
    pub fn snapshot_and_reset(&self) -> TransportSnapshot {
        TransportSnapshot {
            published: self.published.swap(0, Ordering::Relaxed),
            dropped: self.dropped.swap(0, Ordering::Relaxed),
            transferred: self.transferred.swap(0, Ordering::Relaxed),
            truncated: self.truncated.swap(0, Ordering::Relaxed),
            consumed: self.consumed.swap(0, Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    #[inline]
    pub fn reset(&self) {
        self.published.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
        self.transferred.store(0, Ordering::Relaxed);
        self.truncated.store(0, Ordering::Relaxed);
        self.consumed.store(0, Ordering::Relaxed);
    }

    /// Current dropped count.
    #[inline]
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
