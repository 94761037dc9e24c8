//! Producer-side handle of a graph.
//!
//! An [`EventSink`] is the only thing an event source needs: it owns a
//! reference to the graph's ingestion ring and the clock. Cloning it is
//! cheap, but each clone shares the same single-producer ring, so only one
//! thread may publish through a given graph's sinks at a time.
//!
//! # RT Safety
//!
//! [`EventSink::register_event`] and [`EventSink::register_now`] perform no
//! allocation, take no lock and never wait. A full ring drops the event.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tickscope_atomic::{SpscRing, TransportSnapshot};

use crate::clock::TickClock;
use crate::event::TimedEvent;

/// Process-unique identity of a producer thread.
///
/// Tags start at 1; [`ProducerTag::NONE`] means nothing has been published
/// yet. Displayed as hex, e.g. `0x3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProducerTag(u64);

impl ProducerTag {
    /// No producer has published yet.
    pub const NONE: Self = Self(0);

    /// Tag of the calling thread.
    #[must_use]
    pub fn current() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        thread_local! {
            static TAG: u64 = NEXT.fetch_add(1, Ordering::Relaxed);
        }
        Self(TAG.with(|tag| *tag))
    }

    /// Wrap a raw tag value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw tag value.
    #[must_use]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProducerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// State shared between a graph and its sinks.
#[derive(Debug)]
pub(crate) struct SinkShared {
    pub(crate) ingest: SpscRing<TimedEvent>,
    last_producer: AtomicU64,
}

impl SinkShared {
    pub(crate) fn new(ingest: SpscRing<TimedEvent>) -> Self {
        Self {
            ingest,
            last_producer: AtomicU64::new(0),
        }
    }

    pub(crate) fn last_producer(&self) -> ProducerTag {
        ProducerTag(self.last_producer.load(Ordering::Relaxed))
    }
}

/// Cloneable producer handle for one graph.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tickscope_graph::{Graph, GraphConfig, ManualClock, TimedEvent};
///
/// # fn main() -> Result<(), tickscope_graph::GraphError> {
/// let clock = Arc::new(ManualClock::new(1_000_000));
/// let graph = Graph::with_clock("Timer", GraphConfig::for_clock_rate(1_000_000), clock)?;
/// let sink = graph.sink();
///
/// assert!(sink.register_event(TimedEvent::instant(10)));
/// assert!(sink.register_now());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EventSink {
    shared: Arc<SinkShared>,
    clock: Arc<dyn TickClock>,
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink")
            .field("pending", &self.shared.ingest.len())
            .field("last_producer", &self.shared.last_producer())
            .finish_non_exhaustive()
    }
}

impl EventSink {
    pub(crate) fn new(shared: Arc<SinkShared>, clock: Arc<dyn TickClock>) -> Self {
        Self { shared, clock }
    }

    /// Publish `event`. Returns `false` if the ring was full and the event
    /// was dropped.
    #[inline]
    pub fn register_event(&self, event: TimedEvent) -> bool {
        if self.shared.ingest.is_full() {
            self.shared.ingest.counters().record_dropped();
            return false;
        }
        self.shared
            .last_producer
            .store(ProducerTag::current().as_raw(), Ordering::Relaxed);
        self.shared.ingest.try_push(event).is_ok()
    }

    /// Publish an instant at the current clock time.
    #[inline]
    pub fn register_now(&self) -> bool {
        self.register_event(TimedEvent::instant(self.clock.now_ticks()))
    }

    /// Publish a span from `begin` to `end`.
    #[inline]
    pub fn register_span(&self, begin: i64, end: i64) -> bool {
        self.register_event(TimedEvent::span(begin, end))
    }

    /// Thread that most recently published an accepted event.
    #[must_use]
    pub fn last_producer(&self) -> ProducerTag {
        self.shared.last_producer()
    }

    /// Ingestion ring counters.
    #[must_use]
    pub fn transport(&self) -> TransportSnapshot {
        self.shared.ingest.counters().snapshot()
    }

    /// Clock this sink timestamps with.
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn TickClock> {
        &self.clock
    }
}
