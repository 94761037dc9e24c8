//! Timestamped events and their lock-free slot encoding.

use core::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};
use tickscope_atomic::RingSlot;

/// An instant or span on the high-resolution tick clock.
///
/// Instants have `begin == end`. Constructors keep `end >= begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TimedEvent {
    /// Tick at which the event started.
    pub begin: i64,
    /// Tick at which the event finished.
    pub end: i64,
}

impl TimedEvent {
    /// An instantaneous event at `tick`.
    #[must_use]
    pub const fn instant(tick: i64) -> Self {
        Self {
            begin: tick,
            end: tick,
        }
    }

    /// A span from `begin` to `end`. An `end` before `begin` is clamped.
    #[must_use]
    pub const fn span(begin: i64, end: i64) -> Self {
        Self {
            begin,
            end: if end < begin { begin } else { end },
        }
    }

    /// Whether this is the all-zero event.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.begin == 0 && self.end == 0
    }

    /// Whether `begin == end`.
    #[must_use]
    pub const fn is_instant(&self) -> bool {
        self.begin == self.end
    }

    /// Span length in ticks.
    #[must_use]
    pub const fn duration_ticks(&self) -> i64 {
        self.end.saturating_sub(self.begin)
    }
}

/// Ring slot holding one [`TimedEvent`].
#[derive(Debug, Default)]
pub struct EventCell {
    begin: AtomicI64,
    end: AtomicI64,
}

impl RingSlot for TimedEvent {
    type Cell = EventCell;

    #[inline]
    fn new_cell() -> Self::Cell {
        EventCell::default()
    }

    #[inline]
    fn store(cell: &Self::Cell, value: Self) {
        cell.begin.store(value.begin, Ordering::Relaxed);
        cell.end.store(value.end, Ordering::Relaxed);
    }

    #[inline]
    fn load(cell: &Self::Cell) -> Self {
        Self {
            begin: cell.begin.load(Ordering::Relaxed),
            end: cell.end.load(Ordering::Relaxed),
        }
    }
}
