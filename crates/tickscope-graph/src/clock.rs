//! High-resolution tick sources.
//!
//! Every graph reads time through a [`TickClock`] so the frame driver and
//! the producers agree on one time base. [`MonotonicClock`] is the real
//! clock; [`ManualClock`] is driven by hand for tests and replays.

use core::fmt;
use core::sync::atomic::{AtomicI64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

/// A monotonic source of integer ticks.
pub trait TickClock: Send + Sync + fmt::Debug {
    /// Current tick count.
    fn now_ticks(&self) -> i64;

    /// Ticks per second of this clock.
    fn ticks_per_second(&self) -> i64;

    /// Convert a tick count to seconds.
    #[allow(
        clippy::cast_precision_loss,
        reason = "tick intervals are far below 2^52"
    )]
    fn ticks_to_seconds(&self, ticks: i64) -> f64 {
        ticks as f64 / self.ticks_per_second() as f64
    }
}

/// Nanosecond ticks since the first use of the clock in this process.
///
/// All instances share one epoch, so ticks from different threads and
/// different `MonotonicClock` values are comparable.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl MonotonicClock {
    /// Tick rate of the monotonic clock.
    pub const TICKS_PER_SECOND: i64 = 1_000_000_000;

    fn epoch() -> Instant {
        static EPOCH: OnceLock<Instant> = OnceLock::new();
        *EPOCH.get_or_init(Instant::now)
    }
}

impl TickClock for MonotonicClock {
    #[inline]
    fn now_ticks(&self) -> i64 {
        i64::try_from(Self::epoch().elapsed().as_nanos()).unwrap_or(i64::MAX)
    }

    #[inline]
    fn ticks_per_second(&self) -> i64 {
        Self::TICKS_PER_SECOND
    }
}

/// A clock that only moves when told to.
///
/// # Example
///
/// ```rust
/// use tickscope_graph::{ManualClock, TickClock};
///
/// let clock = ManualClock::new(1_000_000);
/// clock.set(500);
/// clock.advance(250);
/// assert_eq!(clock.now_ticks(), 750);
/// ```
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
    ticks_per_second: i64,
}

impl ManualClock {
    /// A clock at tick 0 running at `ticks_per_second`.
    #[must_use]
    pub const fn new(ticks_per_second: i64) -> Self {
        Self {
            now: AtomicI64::new(0),
            ticks_per_second,
        }
    }

    /// Jump to `tick`.
    pub fn set(&self, tick: i64) {
        self.now.store(tick, Ordering::Relaxed);
    }

    /// Move forward by `ticks` and return the new time.
    pub fn advance(&self, ticks: i64) -> i64 {
        self.now.fetch_add(ticks, Ordering::Relaxed).saturating_add(ticks)
    }
}

impl TickClock for ManualClock {
    fn now_ticks(&self) -> i64 {
        self.now.load(Ordering::Relaxed)
    }

    fn ticks_per_second(&self) -> i64 {
        self.ticks_per_second
    }
}
