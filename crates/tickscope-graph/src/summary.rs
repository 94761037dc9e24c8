//! Numeric and textual frame summaries.

use serde::{Deserialize, Serialize};
use tickscope_atomic::IntervalStats;

use crate::sink::ProducerTag;

/// Displayed frequency for a frame with `samples` interval samples.
///
/// The analysis horizon spans two seconds, so half the sample count is the
/// per-second rate.
#[must_use]
pub const fn frequency_hz(samples: u64) -> u64 {
    samples / 2
}

/// The five text lines painted in the top-left corner of a graph.
///
/// Intervals are in milliseconds; empty statistics show `--`.
///
/// # Example
///
/// ```rust
/// use tickscope_atomic::IntervalStats;
/// use tickscope_graph::{ProducerTag, summary_lines};
///
/// let mut stats = IntervalStats::new();
/// stats.record(10.0);
/// stats.record(10.0);
///
/// let lines = summary_lines("Timer", ProducerTag::from_raw(0x1f), &stats);
/// assert_eq!(lines[0], "Timer (0x1f)");
/// assert_eq!(lines[1], "Freq: 1Hz");
/// assert_eq!(lines[4], " Avg: 10.0ms (SD 0.000)");
/// ```
#[must_use]
pub fn summary_lines(name: &str, producer: ProducerTag, stats: &IntervalStats) -> [String; 5] {
    let ms = |value: Option<f64>| value.map_or_else(|| "--".to_owned(), |v| format!("{v:.1}ms"));
    let (avg, sd) = if stats.is_empty() {
        ("--".to_owned(), "--".to_owned())
    } else {
        (format!("{:.1}ms", stats.mean()), format!("{:.3}", stats.std_dev()))
    };

    [
        format!("{name} ({producer})"),
        format!("Freq: {}Hz", frequency_hz(stats.count())),
        format!(" Min: {}", ms(stats.min())),
        format!(" Max: {}", ms(stats.max())),
        format!(" Avg: {avg} (SD {sd})"),
    ]
}

/// Serializable summary of one graph after a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSummary {
    /// Graph name.
    pub name: String,
    /// Most recent producer thread.
    pub producer: ProducerTag,
    /// Sync time of the frame.
    pub sync_time: i64,
    /// Interval samples in the analysis horizon.
    pub samples: u64,
    /// Displayed frequency.
    pub frequency_hz: u64,
    /// Shortest interval in milliseconds.
    pub min_ms: Option<f64>,
    /// Longest interval in milliseconds.
    pub max_ms: Option<f64>,
    /// Mean interval in milliseconds.
    pub mean_ms: Option<f64>,
    /// Interval standard deviation in milliseconds.
    pub std_dev_ms: Option<f64>,
    /// Bars drawn in the visible window.
    pub bars: usize,
    /// Events still retained after expiry.
    pub retained: usize,
    /// Events dropped on a full ingestion ring since the graph was created.
    pub dropped: u64,
    /// Events lost while moving into the retention ring.
    pub truncated: u64,
}

impl FrameSummary {
    /// The text lines for this summary, as painted on the graph.
    #[must_use]
    pub fn lines(&self, stats: &IntervalStats) -> [String; 5] {
        summary_lines(&self.name, self.producer, stats)
    }

    /// A single-line table row.
    #[must_use]
    pub fn table_row(&self) -> String {
        let ms = |value: Option<f64>| value.map_or_else(|| "--".to_owned(), |v| format!("{v:.2}"));
        format!(
            "{:<20} {:>6}Hz {:>9} {:>9} {:>9} {:>9} {:>7}",
            self.name,
            self.frequency_hz,
            ms(self.min_ms),
            ms(self.max_ms),
            ms(self.mean_ms),
            self.std_dev_ms
                .map_or_else(|| "--".to_owned(), |v| format!("{v:.3}")),
            self.dropped,
        )
    }
}
