//! Property-based tests for tickscope-graph.

use std::sync::Arc;

use proptest::prelude::*;
use quickcheck_macros::quickcheck;
use tickscope_graph::prelude::*;
use tickscope_graph::{is_visible, pixel_span, timeline_position};

fn graph(visible: i64, horizon: i64, coalesce: i64) -> Result<Graph, TestCaseError> {
    let config = GraphConfig::builder()
        .capacity(512)
        .clock_rate(1_000_000)
        .visible_window_ticks(visible)
        .analysis_horizon_ticks(horizon)
        .coalesce_threshold_ticks(coalesce)
        .build()
        .map_err(|e| TestCaseError::fail(e.to_string()))?;
    Graph::with_clock("prop", config, Arc::new(ManualClock::new(1_000_000)))
        .map_err(|e| TestCaseError::fail(e.to_string()))
}

/// Publish-ordered ticks built from non-negative gaps.
fn ordered_ticks(gaps: &[i64]) -> Vec<i64> {
    gaps.iter()
        .scan(0i64, |tick, gap| {
            *tick += gap;
            Some(*tick)
        })
        .collect()
}

#[quickcheck]
fn prop_bars_are_at_least_one_pixel(start: i16, len: u8, width: u16) -> bool {
    let start_pos = f64::from(start) / 1_000.0;
    let end_pos = start_pos + f64::from(len) / 1_000.0;
    let (_, w) = pixel_span(start_pos, end_pos, i32::from(width));
    w >= 1
}

#[quickcheck]
fn prop_visible_events_map_inside_timeline(elapsed: u16, window: u16) -> bool {
    let window = i64::from(window) + 1;
    let elapsed = i64::from(elapsed);
    let position = timeline_position(elapsed, window);
    if is_visible(elapsed, window) {
        position > 0.0 && position <= 1.0
    } else {
        position <= 0.0
    }
}

proptest! {
    #[test]
    fn prop_no_expired_event_survives_a_pass(
        gaps in prop::collection::vec(0i64..5_000, 1..200),
        lag in 0i64..50_000,
    ) {
        let horizon = 20_000;
        let mut graph = graph(1_000, horizon, 50)?;
        let ticks = ordered_ticks(&gaps);
        let sink = graph.sink();
        for &tick in &ticks {
            prop_assert!(sink.register_event(TimedEvent::instant(tick)));
        }

        let sync = ticks.last().copied().unwrap_or_default() + lag;
        graph.set_sync_time(sync);
        let expired = graph.analyse().expired;

        let expected_expired = ticks.iter().filter(|&&t| sync - t > horizon).count();
        prop_assert_eq!(expired, expected_expired);
        prop_assert!(graph.retained().all(|event| sync - event.end <= horizon));
        prop_assert_eq!(graph.retained_len(), ticks.len() - expected_expired);
    }

    #[test]
    fn prop_bar_count_follows_gaps(
        gaps in prop::collection::vec(0i64..200, 1..100),
        threshold in 0i64..200,
    ) {
        let mut graph = graph(1_000_000, 2_000_000, threshold)?;
        let ticks = ordered_ticks(&gaps);
        let sink = graph.sink();
        for &tick in &ticks {
            prop_assert!(sink.register_event(TimedEvent::instant(tick)));
        }
        graph.set_sync_time(ticks.last().copied().unwrap_or_default());

        let analysis = graph.analyse();
        let breaks = ticks.windows(2).filter(|w| w.get(1).zip(w.first()).is_some_and(|(b, a)| b - a >= threshold)).count();
        prop_assert_eq!(analysis.bars.len(), breaks + 1);

        let merged: u64 = analysis.bars.iter().map(|bar| u64::from(bar.count)).sum();
        prop_assert_eq!(merged, ticks.len() as u64);
        prop_assert_eq!(analysis.samples(), ticks.len() as u64 - 1);
    }

    #[test]
    fn prop_stats_match_intervals(gaps in prop::collection::vec(1i64..100_000, 2..50)) {
        let mut graph = graph(1_000, 10_000_000, 0)?;
        let ticks = ordered_ticks(&gaps);
        let sink = graph.sink();
        for &tick in &ticks {
            prop_assert!(sink.register_event(TimedEvent::instant(tick)));
        }
        graph.set_sync_time(ticks.last().copied().unwrap_or_default());

        let stats = graph.analyse().stats;
        let intervals: Vec<f64> = gaps.iter().skip(1).map(|&g| g as f64 / 1_000.0).collect();
        let min = intervals.iter().copied().fold(f64::INFINITY, f64::min);
        let max = intervals.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        prop_assert_eq!(stats.count(), intervals.len() as u64);
        prop_assert!(stats.min().is_some_and(|v| (v - min).abs() < 1e-9));
        prop_assert!(stats.max().is_some_and(|v| (v - max).abs() < 1e-9));
    }
}
