//! Multi-source monitor.
//!
//! A [`Monitor`] hosts one [`Graph`] per event source and plays the role of
//! the frame driver: on every display refresh it snapshots the clock once,
//! hands that instant to every graph as the sync time and records the
//! refresh itself on the VBlank graph. Painting is measured too; the span
//! from the start of [`Monitor::paint`] to the end of the last graph lands
//! on the paint graph and shows up in the next frame.

use core::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::canvas::{Canvas, Colour, Rect};
use crate::clock::TickClock;
use crate::config::GraphConfig;
use crate::error::{GraphError, GraphResult};
use crate::event::TimedEvent;
use crate::graph::{Graph, TEXT_INSET};
use crate::sink::EventSink;
use crate::summary::FrameSummary;

/// The event sources a monitor can compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Display refresh callback.
    #[serde(rename = "vblank")]
    VBlank,
    /// Paint pass, recorded as a span.
    Paint,
    /// Periodic message-thread timer.
    Timer,
    /// Deferred update triggered by the high-resolution timer.
    AsyncUpdate,
    /// Dedicated high-resolution timer thread.
    HighResTimer,
}

impl SourceKind {
    /// Every source in display order.
    pub const ALL: [Self; 5] = [
        Self::VBlank,
        Self::Paint,
        Self::Timer,
        Self::AsyncUpdate,
        Self::HighResTimer,
    ];

    /// Graph name for this source.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::VBlank => "VBlank",
            Self::Paint => "paint",
            Self::Timer => "Timer",
            Self::AsyncUpdate => "AsyncUpdater",
            Self::HighResTimer => "HighResolutionTimer",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Configuration of a [`Monitor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Settings shared by every graph.
    pub graph: GraphConfig,
    /// Sources to show, top to bottom.
    pub sources: Vec<SourceKind>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            graph: GraphConfig::default(),
            sources: SourceKind::ALL.to_vec(),
        }
    }
}

impl MonitorConfig {
    /// Default monitor for a clock running at `ticks_per_second`.
    #[must_use]
    pub fn for_clock_rate(ticks_per_second: i64) -> Self {
        Self {
            graph: GraphConfig::for_clock_rate(ticks_per_second),
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph settings are invalid, no source is
    /// listed, or a source is listed twice.
    pub fn validate(&self) -> GraphResult<()> {
        self.graph.validate()?;
        if self.sources.is_empty() {
            return Err(GraphError::invalid_configuration(
                "at least one source is required",
            ));
        }
        for (i, source) in self.sources.iter().enumerate() {
            if self.sources.iter().skip(i + 1).any(|other| other == source) {
                return Err(GraphError::invalid_configuration(format!(
                    "source {source} listed more than once"
                )));
            }
        }
        Ok(())
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Parse`] on malformed JSON, or a validation
    /// error.
    pub fn from_json(json: &str) -> GraphResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Parse`] if serialization fails.
    pub fn to_json_pretty(&self) -> GraphResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// An in-flight measurement of a paint pass.
#[derive(Debug)]
pub struct PaintSpan {
    begin: i64,
    sink: EventSink,
}

impl PaintSpan {
    /// Start measuring now.
    #[must_use]
    pub fn begin(sink: EventSink) -> Self {
        Self {
            begin: sink.clock().now_ticks(),
            sink,
        }
    }

    /// Tick the span started at.
    #[must_use]
    pub const fn begin_tick(&self) -> i64 {
        self.begin
    }

    /// Stop measuring and publish the span. Returns `false` if it was
    /// dropped.
    pub fn finish(self) -> bool {
        let end = self.sink.clock().now_ticks();
        self.sink.register_event(TimedEvent::span(self.begin, end))
    }
}

/// One graph per event source plus an information header.
#[derive(Debug)]
pub struct Monitor {
    clock: Arc<dyn TickClock>,
    graphs: Vec<(SourceKind, Graph)>,
    bounds: Rect,
    header: Rect,
    info: Vec<String>,
}

impl Monitor {
    /// Create a monitor with one graph per configured source.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or does not match
    /// the clock's tick rate.
    pub fn new(config: MonitorConfig, clock: Arc<dyn TickClock>) -> GraphResult<Self> {
        config.validate()?;
        let graphs = config
            .sources
            .iter()
            .map(|&kind| {
                Graph::with_clock(kind.display_name(), config.graph.clone(), Arc::clone(&clock))
                    .map(|graph| (kind, graph))
            })
            .collect::<GraphResult<Vec<_>>>()?;

        debug!(sources = graphs.len(), "monitor created");

        Ok(Self {
            clock,
            graphs,
            bounds: Rect::default(),
            header: Rect::default(),
            info: Vec::new(),
        })
    }

    /// Configured sources, top to bottom.
    pub fn sources(&self) -> impl Iterator<Item = SourceKind> + '_ {
        self.graphs.iter().map(|(kind, _)| *kind)
    }

    /// Graph of a source.
    #[must_use]
    pub fn graph(&self, kind: SourceKind) -> Option<&Graph> {
        self.graphs
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, graph)| graph)
    }

    /// Mutable graph of a source.
    pub fn graph_mut(&mut self, kind: SourceKind) -> Option<&mut Graph> {
        self.graphs
            .iter_mut()
            .find(|(k, _)| *k == kind)
            .map(|(_, graph)| graph)
    }

    /// Producer handle for a source.
    #[must_use]
    pub fn sink(&self, kind: SourceKind) -> Option<EventSink> {
        self.graph(kind).map(Graph::sink)
    }

    /// Clock shared by every graph.
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn TickClock> {
        &self.clock
    }

    /// Frame driver: set one sync time on every graph and record the
    /// refresh on the VBlank graph. Returns the sync time.
    pub fn on_vblank(&mut self) -> i64 {
        let now = self.clock.now_ticks();
        for (_, graph) in &mut self.graphs {
            graph.set_sync_time(now);
        }
        if let Some(graph) = self.graph(SourceKind::VBlank) {
            graph.sink().register_event(TimedEvent::instant(now));
        }
        now
    }

    /// Start measuring a paint pass, if the paint source is shown.
    #[must_use]
    pub fn begin_paint(&self) -> Option<PaintSpan> {
        self.sink(SourceKind::Paint).map(PaintSpan::begin)
    }

    /// Replace the lines shown in the header.
    pub fn set_info(&mut self, lines: Vec<String>) {
        self.info = lines;
    }

    /// Lay out the header and graphs inside `bounds`.
    ///
    /// The height is split into equal rows, one per graph plus one on top
    /// for the header.
    pub fn layout(&mut self, bounds: Rect) {
        self.bounds = bounds;
        let rows = i32::try_from(self.graphs.len())
            .unwrap_or(i32::MAX)
            .saturating_add(1);
        let row_height = bounds.height / rows;

        let mut remaining = bounds;
        self.header = remaining.remove_from_top(row_height);
        for (_, graph) in &mut self.graphs {
            graph.set_bounds(remaining.remove_from_top(row_height));
        }

        debug!(
            width = bounds.width,
            height = bounds.height,
            row_height,
            "monitor laid out"
        );
    }

    /// Header rectangle from the last [`layout`](Self::layout).
    #[must_use]
    pub const fn header_bounds(&self) -> Rect {
        self.header
    }

    /// Paint the header and every graph, measuring the pass on the paint
    /// graph.
    pub fn paint<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        let span = self.begin_paint();

        canvas.fill_rect(self.bounds, Colour::BLACK);
        paint_info(canvas, self.header, &self.info);
        for (_, graph) in &mut self.graphs {
            graph.paint(canvas);
        }

        if let Some(span) = span {
            span.finish();
        }
    }

    /// Run the analysis on every graph without painting.
    pub fn analyse(&mut self) {
        for (_, graph) in &mut self.graphs {
            graph.analyse();
        }
    }

    /// Summaries of the most recent pass, top to bottom.
    #[must_use]
    pub fn summaries(&self) -> Vec<FrameSummary> {
        self.graphs.iter().map(|(_, graph)| graph.summary()).collect()
    }
}

/// Flow `lines` down columns inside `area`, starting a new column when
/// one fills up and stopping at the right edge.
fn paint_info<C: Canvas + ?Sized>(canvas: &mut C, area: Rect, lines: &[String]) {
    let area = area.reduced(TEXT_INSET);
    let line_height = canvas.line_height();
    if line_height <= 0 {
        return;
    }
    let Ok(per_column) = usize::try_from(area.height / line_height) else {
        return;
    };
    if per_column == 0 {
        return;
    }
    let char_width = canvas.char_width();

    let mut indent = 0i32;
    let mut widest = 0i32;
    for (i, line) in lines.iter().enumerate() {
        let row = i % per_column;
        if row == 0 {
            indent = indent.saturating_add(widest);
            widest = 0;
            if indent >= area.width {
                return;
            }
        }

        let chars = i32::try_from(line.chars().count()).unwrap_or(i32::MAX);
        // Two spare characters between columns.
        widest = widest.max(chars.saturating_add(2).saturating_mul(char_width));

        let mut cell = area;
        cell.remove_from_left(indent);
        cell.remove_from_top(i32::try_from(row).unwrap_or(i32::MAX).saturating_mul(line_height));
        canvas.draw_text(line, cell.remove_from_top(line_height), Colour::WHITE);
    }
}
