//! Prelude for tickscope-graph.
//!
//! ```rust
//! use tickscope_graph::prelude::*;
//!
//! let config = GraphConfig::for_clock_rate(1_000_000);
//! assert!(config.validate().is_ok());
//! ```

pub use crate::canvas::{Canvas, Colour, Rect};
pub use crate::clock::{ManualClock, MonotonicClock, TickClock};
pub use crate::config::GraphConfig;
pub use crate::error::{GraphError, GraphResult};
pub use crate::event::TimedEvent;
pub use crate::graph::{FrameAnalysis, Graph};
pub use crate::monitor::{Monitor, MonitorConfig, SourceKind};
pub use crate::sink::{EventSink, ProducerTag};
pub use crate::summary::FrameSummary;
pub use crate::text_canvas::TextCanvas;
pub use tickscope_atomic::IntervalStats;
