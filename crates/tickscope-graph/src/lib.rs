//! # tickscope-graph
//!
//! Rolling jitter analysis and timeline projection for timestamped events.
//!
//! Each [`Graph`] measures one event source. Producers publish through a
//! cloneable [`EventSink`] without blocking; once per frame the consumer
//! sets a sync time and calls [`Graph::analyse`] or [`Graph::paint`],
//! which drains new events, computes interval statistics over the
//! analysis horizon, expires old events and projects the visible window
//! onto a timeline of bars.
//!
//! ## Architecture
//!
//! - [`event`] - [`TimedEvent`] and its lock-free ring slot
//! - [`clock`] - [`TickClock`], [`MonotonicClock`], [`ManualClock`]
//! - [`config`] - [`GraphConfig`] with validation and builder
//! - [`sink`] - [`EventSink`] producer handle and [`ProducerTag`]
//! - [`graph`] - [`Graph`], [`FrameAnalysis`], [`Bar`]
//! - [`projection`] - pure tick-to-pixel mapping
//! - [`canvas`] / [`text_canvas`] - drawing abstraction and a character grid
//! - [`summary`] - text lines and [`FrameSummary`]
//! - [`monitor`] - [`Monitor`], one graph per [`SourceKind`]
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use tickscope_graph::prelude::*;
//!
//! # fn main() -> Result<(), GraphError> {
//! let clock = Arc::new(ManualClock::new(1_000_000));
//! let mut graph = Graph::with_clock("Timer", GraphConfig::for_clock_rate(1_000_000), clock.clone())?;
//! let sink = graph.sink();
//!
//! for _ in 0..10 {
//!     clock.advance(10_000);
//!     sink.register_now();
//! }
//!
//! graph.set_sync_time(clock.now_ticks());
//! let stats = graph.analyse().stats;
//! assert_eq!(stats.count(), 9);
//! assert!((stats.mean() - 10.0).abs() < 1e-9);
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

pub mod canvas;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod graph;
pub mod monitor;
pub mod projection;
pub mod sink;
pub mod summary;
pub mod text_canvas;

pub mod prelude;

pub use canvas::{Canvas, Colour, Rect};
pub use clock::{ManualClock, MonotonicClock, TickClock};
pub use config::{GraphConfig, GraphConfigBuilder};
pub use error::{GraphError, GraphResult};
pub use event::{EventCell, TimedEvent};
pub use graph::{Bar, FrameAnalysis, Graph, GraphCounters};
pub use monitor::{Monitor, MonitorConfig, PaintSpan, SourceKind};
pub use projection::{bar_height, is_visible, pixel_span, timeline_position};
pub use sink::{EventSink, ProducerTag};
pub use summary::{FrameSummary, frequency_hz, summary_lines};
pub use text_canvas::TextCanvas;
