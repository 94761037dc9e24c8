//! # tickscope-atomic
//!
//! Lock-free transport and statistics primitives for `tickscope`.
//!
//! Event sources (display sync callbacks, timers, audio threads) publish
//! timestamped events into a bounded single-producer/single-consumer ring
//! without allocations, locks or syscalls. Once per frame the rendering
//! thread migrates the ready events into a larger retention ring and
//! rebuilds interval statistics from what is retained.
//!
//! ## Safety Guarantees
//!
//! - **No heap allocations** after a ring is constructed
//! - **No blocking operations**: a full ring drops the newest value
//! - **No unsafe code**: slots are atomic cells, ordering comes from the
//!   release/acquire handshake on the read and write indices
//!
//! ## Architecture
//!
//! - [`ring`] - [`SpscRing`], the generic two-block SPSC ring and [`RingSlot`]
//! - [`counters`] - Relaxed atomic transport counters
//! - [`stats`] - [`IntervalStats`], a streaming min/max/mean/stddev accumulator
//! - [`error`] - Construction errors
//!
//! ## Usage
//!
//! ```rust
//! use tickscope_atomic::SpscRing;
//!
//! # fn main() -> Result<(), tickscope_atomic::RingError> {
//! let ingest: SpscRing<u64> = SpscRing::with_capacity(4)?;
//! let retained: SpscRing<u64> = SpscRing::with_capacity(16)?;
//!
//! // Producer side, any thread
//! assert!(ingest.try_push(10).is_ok());
//! assert!(ingest.try_push(20).is_ok());
//!
//! // Consumer side, once per frame
//! assert_eq!(ingest.transfer_to(&retained), 2);
//! assert_eq!(retained.iter_ready().collect::<Vec<_>>(), vec![10, 20]);
//! # Ok(())
//! # }
//! ```

#![deny(
    unsafe_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod counters;
pub mod error;
pub mod ring;
pub mod stats;

pub mod prelude;

pub use counters::{TransportCounters, TransportSnapshot};
pub use error::RingError;
pub use ring::{FifoBlocks, ReadyIter, RingSlot, SpscRing};
pub use stats::IntervalStats;

/// Default slot count for both ingestion and retention rings.
pub const DEFAULT_RING_CAPACITY: usize = 10_000;
