//! Bounded single-producer/single-consumer ring.
//!
//! [`SpscRing`] is a fixed array of atomic slots plus a free-running pair of
//! read/write positions. The producer writes a slot and then publishes it by
//! advancing the write position with `Release`; the consumer acquires the
//! write position, reads the slots and releases them by advancing the read
//! position. Positions grow without bound (wrapping on overflow) and map to
//! slots modulo the capacity, so all `capacity` slots are usable.
//!
//! The ready range of a ring is at most two contiguous runs of slots, the
//! second one starting at slot 0 when the range wraps. [`FifoBlocks`]
//! describes those runs.
//!
//! # Overflow Behavior
//!
//! A push onto a full ring returns the value to the caller and counts it as
//! dropped. The producer never waits for the consumer.
//!
//! # Threading contract
//!
//! Exactly one thread may push at a time and exactly one thread may read at
//! a time. Violating this cannot cause undefined behavior (every slot is an
//! atomic cell) but values may be lost or duplicated.

use core::fmt;
use core::iter::Chain;
use core::ops::Range;
use core::sync::atomic::{AtomicI64, AtomicU32, AtomicU64, AtomicUsize, Ordering};

use crossbeam::utils::CachePadded;

use crate::counters::TransportCounters;
use crate::error::RingError;

/// A `Copy` value that can live in a lock-free ring slot.
///
/// `Cell` is the interior-mutable storage for one slot. Implementations use
/// relaxed atomics: visibility is provided by the ring's index handshake,
/// not by the cell itself.
pub trait RingSlot: Copy {
    /// Storage for one slot.
    type Cell: Send + Sync;

    /// Create an empty cell.
    fn new_cell() -> Self::Cell;

    /// Overwrite the cell.
    fn store(cell: &Self::Cell, value: Self);

    /// Read the cell.
    fn load(cell: &Self::Cell) -> Self;
}

macro_rules! impl_ring_slot {
    ($($value:ty => $atomic:ty),* $(,)?) => {
        $(
            impl RingSlot for $value {
                type Cell = $atomic;

                #[inline]
                fn new_cell() -> Self::Cell {
                    <$atomic>::new(0)
                }

                #[inline]
                fn store(cell: &Self::Cell, value: Self) {
                    cell.store(value, Ordering::Relaxed);
                }

                #[inline]
                fn load(cell: &Self::Cell) -> Self {
                    cell.load(Ordering::Relaxed)
                }
            }
        )*
    };
}

impl_ring_slot!(
    u32 => AtomicU32,
    u64 => AtomicU64,
    i64 => AtomicI64,
    usize => AtomicUsize,
);

/// The (at most) two contiguous slot runs covering a range of a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FifoBlocks {
    /// First slot of the first run.
    pub start1: usize,
    /// Length of the first run.
    pub len1: usize,
    /// First slot of the second run (always 0 when non-empty).
    pub start2: usize,
    /// Length of the second run.
    pub len2: usize,
}

impl FifoBlocks {
    /// Split `count` slots starting at free-running `position`.
    #[must_use]
    pub fn for_range(position: usize, count: usize, capacity: usize) -> Self {
        if capacity == 0 {
            return Self::default();
        }
        let count = count.min(capacity);
        let start1 = position % capacity;
        let len1 = count.min(capacity - start1);
        Self {
            start1,
            len1,
            start2: 0,
            len2: count - len1,
        }
    }

    /// Total number of slots covered.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.len1 + self.len2
    }

    /// Whether the range wraps around the end of the slot array.
    #[must_use]
    pub const fn wraps(&self) -> bool {
        self.len2 > 0
    }

    /// Slot indices in order, first run then second run.
    #[must_use]
    pub fn indices(&self) -> Chain<Range<usize>, Range<usize>> {
        (self.start1..self.start1 + self.len1).chain(self.start2..self.start2 + self.len2)
    }
}

/// Bounded lock-free SPSC ring.
///
/// # Example
///
/// ```rust
/// use tickscope_atomic::SpscRing;
///
/// # fn main() -> Result<(), tickscope_atomic::RingError> {
/// let ring: SpscRing<u64> = SpscRing::with_capacity(2)?;
///
/// assert!(ring.try_push(1).is_ok());
/// assert!(ring.try_push(2).is_ok());
/// assert_eq!(ring.try_push(3), Err(3)); // full: newest value is dropped
///
/// assert_eq!(ring.pop(), Some(1));
/// assert_eq!(ring.pop(), Some(2));
/// assert_eq!(ring.pop(), None);
/// # Ok(())
/// # }
/// ```
pub struct SpscRing<T: RingSlot> {
    slots: Box<[T::Cell]>,
    /// Next position the consumer will read.
    read: CachePadded<AtomicUsize>,
    /// Next position the producer will write.
    write: CachePadded<AtomicUsize>,
    counters: TransportCounters,
}

impl<T: RingSlot> fmt::Debug for SpscRing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpscRing")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("counters", &self.counters)
            .finish_non_exhaustive()
    }
}

impl<T: RingSlot> SpscRing<T> {
    /// Create a ring with `capacity` slots.
    ///
    /// This is the only allocating operation.
    ///
    /// # Errors
    ///
    /// Returns [`RingError::ZeroCapacity`] if `capacity` is 0.
    pub fn with_capacity(capacity: usize) -> Result<Self, RingError> {
        if capacity == 0 {
            return Err(RingError::ZeroCapacity);
        }
        let slots = (0..capacity)
            .map(|_| T::new_cell())
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(Self {
            slots,
            read: CachePadded::new(AtomicUsize::new(0)),
            write: CachePadded::new(AtomicUsize::new(0)),
            counters: TransportCounters::new(),
        })
    }

    /// Number of slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of values ready to read.
    ///
    /// Exact on the consumer thread; may be stale anywhere else.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        let read = self.read.load(Ordering::Acquire);
        let write = self.write.load(Ordering::Acquire);
        write.wrapping_sub(read).min(self.capacity())
    }

    /// Number of slots a producer can still fill.
    #[inline]
    #[must_use]
    pub fn free_space(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Whether no values are ready.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a push would be dropped.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.free_space() == 0
    }

    /// Transport counters for this ring.
    #[inline]
    #[must_use]
    pub fn counters(&self) -> &TransportCounters {
        &self.counters
    }

    /// Publish one value (producer side).
    ///
    /// # RT Safety
    ///
    /// Wait-free: two atomic loads, one slot store and one release store.
    ///
    /// # Errors
    ///
    /// Returns `Err(value)` if the ring is full; the value is dropped and
    /// counted.
    #[inline]
    pub fn try_push(&self, value: T) -> Result<(), T> {
        let write = self.write.load(Ordering::Relaxed);
        let read = self.read.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= self.capacity() {
            self.counters.record_dropped();
            return Err(value);
        }

        let Some(cell) = self.slots.get(write % self.capacity()) else {
            self.counters.record_dropped();
            return Err(value);
        };
        T::store(cell, value);
        self.write.store(write.wrapping_add(1), Ordering::Release);
        self.counters.record_published();
        Ok(())
    }

    /// Slot runs holding the values that are ready (consumer side).
    #[inline]
    #[must_use]
    pub fn ready_blocks(&self) -> FifoBlocks {
        let read = self.read.load(Ordering::Relaxed);
        let write = self.write.load(Ordering::Acquire);
        let ready = write.wrapping_sub(read).min(self.capacity());
        FifoBlocks::for_range(read, ready, self.capacity())
    }

    /// Read the slot at physical `index`.
    ///
    /// Only meaningful for indices inside [`ready_blocks`](Self::ready_blocks).
    #[inline]
    #[must_use]
    pub fn load(&self, index: usize) -> Option<T> {
        self.slots.get(index).map(T::load)
    }

    /// Iterate over the ready values, oldest first, without consuming them.
    #[must_use]
    pub fn iter_ready(&self) -> ReadyIter<'_, T> {
        ReadyIter {
            ring: self,
            indices: self.ready_blocks().indices(),
        }
    }

    /// Release up to `count` values from the front (consumer side).
    ///
    /// Returns the number actually released, which is clamped to the ready
    /// count.
    pub fn finish_read(&self, count: usize) -> usize {
        let read = self.read.load(Ordering::Relaxed);
        let write = self.write.load(Ordering::Acquire);
        let released = count.min(write.wrapping_sub(read).min(self.capacity()));

        if released > 0 {
            self.read
                .store(read.wrapping_add(released), Ordering::Release);
            self.counters.record_consumed(released as u64);
        }
        released
    }

    /// Take the oldest value (consumer side).
    pub fn pop(&self) -> Option<T> {
        let index = self.ready_blocks().indices().next()?;
        let value = self.load(index)?;
        self.finish_read(1);
        Some(value)
    }

    /// Migrate every ready value into `dest`, preserving order.
    ///
    /// Must be called from the thread that consumes `self` and produces
    /// into `dest`. Returns the number of values copied.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `dest` cannot take every ready value; the
    /// retention ring is expected to be at least as large as the ingestion
    /// ring. Release builds copy what fits and discard the rest.
    pub fn transfer_to(&self, dest: &Self) -> usize {
        let blocks = self.ready_blocks();
        let ready = blocks.total();
        if ready == 0 {
            return 0;
        }

        let free = dest.free_space();
        debug_assert!(
            free >= ready,
            "destination ring overflow: {ready} values ready, {free} slots free"
        );
        let moved = ready.min(free);

        let dest_write = dest.write.load(Ordering::Relaxed);
        let dest_capacity = dest.capacity();
        for (offset, index) in blocks.indices().take(moved).enumerate() {
            let target = dest_write.wrapping_add(offset) % dest_capacity;
            if let (Some(value), Some(cell)) = (self.load(index), dest.slots.get(target)) {
                T::store(cell, value);
            }
        }
        dest.write
            .store(dest_write.wrapping_add(moved), Ordering::Release);
        dest.counters.record_published_by(moved as u64);

        let read = self.read.load(Ordering::Relaxed);
        self.read.store(read.wrapping_add(ready), Ordering::Release);
        self.counters.record_transferred(moved as u64);
        if moved < ready {
            self.counters.record_truncated((ready - moved) as u64);
        }

        moved
    }

    /// Discard every ready value (consumer side).
    pub fn clear(&self) -> usize {
        self.finish_read(usize::MAX)
    }
}

/// Iterator over the ready values of a ring, oldest first.
///
/// Created by [`SpscRing::iter_ready`]. The range is fixed at creation:
/// values published afterwards are not visited.
pub struct ReadyIter<'a, T: RingSlot> {
    ring: &'a SpscRing<T>,
    indices: Chain<Range<usize>, Range<usize>>,
}

impl<T: RingSlot> fmt::Debug for ReadyIter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadyIter")
            .field("indices", &self.indices)
            .finish_non_exhaustive()
    }
}

impl<T: RingSlot> Iterator for ReadyIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let index = self.indices.next()?;
        self.ring.load(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}
