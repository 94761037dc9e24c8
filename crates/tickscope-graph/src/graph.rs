//! One jitter graph: ingestion, rolling analysis and painting.
//!
//! A [`Graph`] owns two rings. Producers publish into the ingestion ring
//! through an [`EventSink`]; once per frame the consumer calls
//! [`Graph::analyse`] (or [`Graph::paint`], which analyses first), which
//! moves every ready event into the retention ring and walks the retained
//! events oldest first:
//!
//! 1. events that begin after the sync time are skipped and kept,
//! 2. events that ended more than the analysis horizon ago are expired,
//! 3. every other event contributes the interval to its predecessor to
//!    the statistics,
//! 4. events overlapping the visible window become bars, merged with their
//!    predecessor's bar when closer than the coalesce threshold.
//!
//! Expired events at the front of the retention ring are then released in
//! one step.

use std::sync::Arc;

use tickscope_atomic::{IntervalStats, ReadyIter, SpscRing, TransportSnapshot};
use tracing::{debug, trace, warn};

use crate::canvas::{Canvas, Colour, Rect};
use crate::clock::{MonotonicClock, TickClock};
use crate::config::GraphConfig;
use crate::error::{GraphError, GraphResult};
use crate::event::TimedEvent;
use crate::projection::{bar_height, is_visible, pixel_span, timeline_position};
use crate::sink::{EventSink, ProducerTag, SinkShared};
use crate::summary::{FrameSummary, frequency_hz, summary_lines};

/// Number of vertical grid lines.
pub const GRID_LINES: u8 = 100;
/// Width of the fade at the left edge, in pixels.
pub const FADE_WIDTH: i32 = 200;
/// Inset of the text block from the graph edges, in pixels.
pub const TEXT_INSET: i32 = 5;

/// A horizontal run on the timeline with its coalesce count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Left edge as a fraction of the width.
    pub start: f64,
    /// Right edge as a fraction of the width.
    pub end: f64,
    /// Number of events merged into this bar.
    pub count: u32,
}

/// Result of one analysis pass.
///
/// The bar buffer is reused from frame to frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameAnalysis {
    /// Sync time the pass ran at.
    pub sync_time: i64,
    /// Events moved from the ingestion ring this frame.
    pub drained: usize,
    /// Bars to draw, oldest first.
    pub bars: Vec<Bar>,
    /// Interval statistics in milliseconds.
    pub stats: IntervalStats,
    /// Expired events released from the front of the retention ring.
    pub expired: usize,
    /// Expired events kept because a newer event sits in front of them.
    pub stale: usize,
    /// Events skipped because they begin after the sync time.
    pub future: usize,
}

impl FrameAnalysis {
    fn begin_frame(&mut self, sync_time: i64, drained: usize) {
        self.sync_time = sync_time;
        self.drained = drained;
        self.bars.clear();
        self.stats.reset();
        self.expired = 0;
        self.stale = 0;
        self.future = 0;
    }

    /// Number of interval samples.
    #[must_use]
    pub const fn samples(&self) -> u64 {
        self.stats.count()
    }
}

/// Transport counters of both rings of a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphCounters {
    /// Producer-facing ring.
    pub ingest: TransportSnapshot,
    /// Retention ring.
    pub retained: TransportSnapshot,
}

/// A named jitter graph for one event source.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use tickscope_graph::{Graph, GraphConfig, ManualClock, TimedEvent};
///
/// # fn main() -> Result<(), tickscope_graph::GraphError> {
/// let config = GraphConfig::builder()
///     .clock_rate(1_000_000)
///     .visible_window_ticks(1_000)
///     .analysis_horizon_ticks(10_000)
///     .coalesce_threshold_ticks(50)
///     .build()?;
/// let mut graph = Graph::with_clock("Timer", config, Arc::new(ManualClock::new(1_000_000)))?;
///
/// let sink = graph.sink();
/// for tick in [0, 100, 205, 400] {
///     sink.register_event(TimedEvent::instant(tick));
/// }
///
/// graph.set_sync_time(500);
/// let analysis = graph.analyse();
/// assert_eq!(analysis.bars.len(), 4);
/// assert_eq!(analysis.samples(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Graph {
    name: String,
    config: GraphConfig,
    clock: Arc<dyn TickClock>,
    shared: Arc<SinkShared>,
    retained: SpscRing<TimedEvent>,
    sync_time: i64,
    bounds: Rect,
    analysis: FrameAnalysis,
}

impl Graph {
    /// Create a graph on the process-wide monotonic clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or was not written
    /// for the monotonic clock's tick rate.
    pub fn new(name: impl Into<String>, config: GraphConfig) -> GraphResult<Self> {
        Self::with_clock(name, config, Arc::new(MonotonicClock))
    }

    /// Create a graph reading time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidConfiguration`] for out-of-range values
    /// and [`GraphError::ClockRateMismatch`] if `config` was computed for a
    /// different tick rate than `clock` runs at.
    pub fn with_clock(
        name: impl Into<String>,
        config: GraphConfig,
        clock: Arc<dyn TickClock>,
    ) -> GraphResult<Self> {
        config.validate()?;
        if config.ticks_per_second != clock.ticks_per_second() {
            return Err(GraphError::ClockRateMismatch {
                config: config.ticks_per_second,
                clock: clock.ticks_per_second(),
            });
        }

        let ingest = SpscRing::with_capacity(config.capacity)?;
        let retained = SpscRing::with_capacity(config.capacity)?;
        let name = name.into();

        debug!(
            graph = %name,
            capacity = config.capacity,
            visible_window_ticks = config.visible_window_ticks,
            analysis_horizon_ticks = config.analysis_horizon_ticks,
            coalesce_threshold_ticks = config.coalesce_threshold_ticks,
            "graph created"
        );

        Ok(Self {
            name,
            config,
            clock,
            shared: Arc::new(SinkShared::new(ingest)),
            retained,
            sync_time: 0,
            bounds: Rect::default(),
            analysis: FrameAnalysis::default(),
        })
    }

    /// Graph name, shown in the first text line.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Clock shared with the sinks.
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn TickClock> {
        &self.clock
    }

    /// A producer handle for this graph.
    #[must_use]
    pub fn sink(&self) -> EventSink {
        EventSink::new(Arc::clone(&self.shared), Arc::clone(&self.clock))
    }

    /// Set the sync time for the next pass.
    pub fn set_sync_time(&mut self, tick: i64) {
        self.sync_time = tick;
    }

    /// Sync time of the next pass.
    #[must_use]
    pub const fn sync_time(&self) -> i64 {
        self.sync_time
    }

    /// Set the pixel rectangle painted by [`paint`](Self::paint).
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Current pixel rectangle.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Number of events held in the retention ring.
    #[must_use]
    pub fn retained_len(&self) -> usize {
        self.retained.len()
    }

    /// Retained events, oldest first.
    #[must_use]
    pub fn retained(&self) -> ReadyIter<'_, TimedEvent> {
        self.retained.iter_ready()
    }

    /// Most recent producer thread.
    #[must_use]
    pub fn last_producer(&self) -> ProducerTag {
        self.shared.last_producer()
    }

    /// Counters of both rings.
    #[must_use]
    pub fn counters(&self) -> GraphCounters {
        GraphCounters {
            ingest: self.shared.ingest.counters().snapshot(),
            retained: self.retained.counters().snapshot(),
        }
    }

    /// Result of the most recent pass.
    #[must_use]
    pub const fn last_analysis(&self) -> &FrameAnalysis {
        &self.analysis
    }

    /// Drain new events and run the rolling analysis at the current sync
    /// time.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the retention ring cannot take every
    /// ready event.
    pub fn analyse(&mut self) -> &FrameAnalysis {
        let ready = self.shared.ingest.len();
        let drained = self.shared.ingest.transfer_to(&self.retained);
        if drained < ready {
            warn!(
                graph = %self.name,
                ready,
                drained,
                "retention ring full, events truncated"
            );
        }

        let sync_time = self.sync_time;
        let visible = self.config.visible_window_ticks;
        let horizon = self.config.analysis_horizon_ticks;
        let coalesce = self.config.coalesce_threshold_ticks;

        let analysis = &mut self.analysis;
        analysis.begin_frame(sync_time, drained);

        let mut previous: Option<(TimedEvent, bool)> = None;
        let mut leading_expired = 0usize;
        let mut in_expired_prefix = true;
        let mut last_index: Option<usize> = None;

        for index in self.retained.ready_blocks().indices() {
            debug_assert_ne!(Some(index), last_index, "retained slot visited twice");
            last_index = Some(index);

            let Some(event) = self.retained.load(index) else {
                continue;
            };

            if event.begin > sync_time {
                analysis.future += 1;
                in_expired_prefix = false;
                continue;
            }

            let elapsed_end = sync_time.saturating_sub(event.end);
            if elapsed_end > horizon {
                if in_expired_prefix {
                    leading_expired += 1;
                } else {
                    analysis.stale += 1;
                }
                continue;
            }
            in_expired_prefix = false;

            if let Some((prev, _)) = previous {
                analysis
                    .stats
                    .record(self.config.ticks_to_ms(event.begin.saturating_sub(prev.begin)));
            }

            let elapsed_start = sync_time.saturating_sub(event.begin);
            let drawn = is_visible(elapsed_start, visible) || is_visible(elapsed_end, visible);
            if drawn {
                let end = timeline_position(elapsed_end, visible);
                let merge_with = previous
                    .filter(|(prev, _)| event.begin.saturating_sub(prev.begin) < coalesce);

                let extended = match merge_with {
                    Some((_, true)) => analysis.bars.last_mut().map(|bar| {
                        bar.count = bar.count.saturating_add(1);
                        bar.end = bar.end.max(end);
                    }),
                    _ => None,
                };

                if extended.is_none() {
                    // An undrawn predecessor anchors a new bar at its begin.
                    let (anchor, count) = match merge_with {
                        Some((prev, _)) => (sync_time.saturating_sub(prev.begin), 2),
                        None => (elapsed_start, 1),
                    };
                    analysis.bars.push(Bar {
                        start: timeline_position(anchor, visible),
                        end,
                        count,
                    });
                }
            }

            previous = Some((event, drawn));
        }

        analysis.expired = self.retained.finish_read(leading_expired);

        if analysis.expired > 0 || analysis.stale > 0 {
            trace!(
                graph = %self.name,
                expired = analysis.expired,
                stale = analysis.stale,
                retained = self.retained.len(),
                "expired events released"
            );
        }

        analysis
    }

    /// The five text lines for the most recent pass.
    #[must_use]
    pub fn text_lines(&self) -> [String; 5] {
        summary_lines(&self.name, self.last_producer(), &self.analysis.stats)
    }

    /// Analyse, then paint into `canvas` within [`bounds`](Self::bounds).
    ///
    /// Paints a black background, the grid, the bars, a fade over the left
    /// edge, a white border and the text block.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "grid columns are bounded by the graph width"
    )]
    pub fn paint<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        self.analyse();

        let bounds = self.bounds;
        if bounds.is_empty() {
            return;
        }
        let (width, height) = (bounds.width, bounds.height);

        canvas.fill_rect(bounds, Colour::BLACK);

        for i in 0..GRID_LINES {
            let alpha = if i % 10 == 0 { 0.3 } else { 0.1 };
            let x = bounds.x + (f64::from(width) * f64::from(i) / f64::from(GRID_LINES)) as i32;
            canvas.draw_vertical_line(x, bounds.y, bounds.bottom(), Colour::WHITE.with_alpha(alpha));
        }

        for bar in &self.analysis.bars {
            let (x, bar_width) = pixel_span(bar.start, bar.end, width);
            let bar_height = bar_height(height, bar.count);
            let rect = Rect::new(
                bounds.x.saturating_add(x),
                bounds.bottom().saturating_sub(bar_height),
                bar_width,
                bar_height,
            )
            .intersection(&bounds);
            if !rect.is_empty() {
                canvas.fill_rect(rect, Colour::YELLOW);
            }
        }

        let mut fade = bounds;
        let fade = fade.remove_from_left(FADE_WIDTH);
        canvas.fill_horizontal_gradient(fade, Colour::BLACK, Colour::TRANSPARENT_BLACK);
        canvas.draw_rect_outline(bounds, Colour::WHITE);

        let mut text_area = bounds.reduced(TEXT_INSET);
        let line_height = canvas.line_height();
        for line in self.text_lines() {
            canvas.draw_text(&line, text_area.remove_from_top(line_height), Colour::WHITE);
        }
    }

    /// Numeric summary of the most recent pass.
    #[must_use]
    pub fn summary(&self) -> FrameSummary {
        let stats = &self.analysis.stats;
        let non_empty = |value: f64| (!stats.is_empty()).then_some(value);
        let counters = self.counters();
        FrameSummary {
            name: self.name.clone(),
            producer: self.last_producer(),
            sync_time: self.analysis.sync_time,
            samples: stats.count(),
            frequency_hz: frequency_hz(stats.count()),
            min_ms: stats.min(),
            max_ms: stats.max(),
            mean_ms: non_empty(stats.mean()),
            std_dev_ms: non_empty(stats.std_dev()),
            bars: self.analysis.bars.len(),
            retained: self.retained_len(),
            dropped: counters.ingest.dropped,
            truncated: counters.ingest.truncated,
        }
    }
}
