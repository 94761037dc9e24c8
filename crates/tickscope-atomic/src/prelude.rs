//! Prelude for tickscope-atomic.
//!
//! Re-exports the types most callers need.
//!
//! # Example
//!
//! ```rust
//! use tickscope_atomic::prelude::*;
//!
//! let mut stats = IntervalStats::new();
//! stats.record(10.0);
//! assert_eq!(stats.count(), 1);
//! ```

pub use crate::DEFAULT_RING_CAPACITY;
pub use crate::counters::{TransportCounters, TransportSnapshot};
pub use crate::error::RingError;
pub use crate::ring::{FifoBlocks, RingSlot, SpscRing};
pub use crate::stats::IntervalStats;
