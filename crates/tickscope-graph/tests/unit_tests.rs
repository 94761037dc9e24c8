//! Unit tests for tickscope-graph.
//!
//! These drive whole frames through the public API: publish, set the sync
//! time, analyse, and inspect bars, statistics and what stays retained.

use std::sync::Arc;

use tickscope_graph::prelude::*;
use tickscope_test_helpers::{assert_approx_eq, assert_interval_stats};
use tickscope_test_helpers::prelude::*;

/// 1000 ticks per millisecond.
const TICKS_PER_SECOND: i64 = 1_000_000;

fn graph_with(visible: i64, horizon: i64, coalesce: i64, capacity: usize) -> GraphResult<Graph> {
    let config = GraphConfig::builder()
        .capacity(capacity)
        .clock_rate(TICKS_PER_SECOND)
        .visible_window_ticks(visible)
        .analysis_horizon_ticks(horizon)
        .coalesce_threshold_ticks(coalesce)
        .build()?;
    Graph::with_clock("test", config, Arc::new(ManualClock::new(TICKS_PER_SECOND)))
}

fn scenario_graph() -> GraphResult<Graph> {
    graph_with(1_000, 10_000, 50, 64)
}

fn publish(graph: &Graph, ticks: &[i64]) {
    let sink = graph.sink();
    for &tick in ticks {
        assert!(sink.register_event(TimedEvent::instant(tick)), "tick {tick} dropped");
    }
}

#[test]
fn test_end_to_end_frame() -> TestResult {
    let mut graph = scenario_graph()?;
    publish(&graph, &[0, 100, 205, 400]);
    graph.set_sync_time(500);

    let analysis = graph.analyse();
    assert_eq!(analysis.drained, 4);
    assert_eq!(analysis.bars.len(), 4);
    assert!(analysis.bars.iter().all(|bar| bar.count == 1));

    assert_interval_stats!(
        analysis.stats,
        count: 3,
        min: 0.1,
        max: 0.195,
        mean: 0.4 / 3.0,
        tol: 1e-12,
    );

    let starts: Vec<f64> = analysis.bars.iter().map(|bar| bar.start).collect();
    for (start, expected) in starts.iter().zip([0.5, 0.6, 0.705, 0.9]) {
        assert_approx_eq!(*start, expected, 1e-12);
    }
    Ok(())
}

#[test]
fn test_evenly_spaced_events_have_no_jitter() -> TestResult {
    let mut graph = Graph::with_clock(
        "Timer",
        GraphConfig::for_clock_rate(TICKS_PER_SECOND),
        Arc::new(ManualClock::new(TICKS_PER_SECOND)),
    )?;
    let ticks = evenly_spaced(0, 10 * TICKS_PER_MS, 10);
    publish(&graph, &ticks);
    graph.set_sync_time(ms_to_ticks(90.0));

    let stats = graph.analyse().stats;
    assert_interval_stats!(stats, count: 9, min: 10.0, max: 10.0, mean: 10.0, tol: 1e-9);
    assert_approx_eq!(stats.std_dev(), 0.0, 1e-9);
    Ok(())
}

#[test]
fn test_visible_boundary_is_counted_but_not_drawn() -> TestResult {
    let mut graph = scenario_graph()?;
    publish(&graph, &[0, 1_000]);
    graph.set_sync_time(2_000);

    let analysis = graph.analyse();
    assert!(analysis.bars.is_empty());
    assert_eq!(analysis.samples(), 1);
    Ok(())
}

#[test]
fn test_single_event_is_one_bar() -> TestResult {
    let mut graph = scenario_graph()?;
    publish(&graph, &[250]);
    graph.set_sync_time(500);

    let analysis = graph.analyse();
    assert_eq!(analysis.samples(), 0);
    assert_eq!(analysis.bars.len(), 1);
    assert_eq!(analysis.bars.first().map(|bar| bar.count), Some(1));
    Ok(())
}

#[test]
fn test_close_events_coalesce() -> TestResult {
    let mut graph = scenario_graph()?;
    publish(&graph, &[100, 110, 120, 130]);
    graph.set_sync_time(500);

    let analysis = graph.analyse();
    assert_eq!(analysis.bars.len(), 1);
    assert_eq!(analysis.bars.first().map(|bar| bar.count), Some(4));
    assert_eq!(analysis.samples(), 3);
    Ok(())
}

#[test]
fn test_zero_threshold_disables_coalescing() -> TestResult {
    let mut graph = graph_with(1_000, 10_000, 0, 64)?;
    publish(&graph, &[100, 100, 110, 120]);
    graph.set_sync_time(500);

    let analysis = graph.analyse();
    assert_eq!(analysis.bars.len(), 4);
    assert!(analysis.bars.iter().all(|bar| bar.count == 1));
    Ok(())
}

#[test]
fn test_expired_events_are_released() -> TestResult {
    let mut graph = scenario_graph()?;
    publish(&graph, &[0, 5_000, 20_000]);
    graph.set_sync_time(20_000);

    let analysis = graph.analyse();
    assert_eq!(analysis.expired, 2);
    assert_eq!(analysis.samples(), 0);
    assert_eq!(graph.retained_len(), 1);
    assert_eq!(graph.retained().collect::<Vec<_>>(), vec![TimedEvent::instant(20_000)]);
    Ok(())
}

#[test]
fn test_future_events_wait_for_their_frame() -> TestResult {
    let mut graph = scenario_graph()?;
    publish(&graph, &[100, 600]);

    graph.set_sync_time(500);
    assert_eq!(graph.analyse().future, 1);
    assert_eq!(graph.analyse().samples(), 0);

    graph.set_sync_time(700);
    let analysis = graph.analyse();
    assert_eq!(analysis.future, 0);
    assert_eq!(analysis.samples(), 1);
    assert_eq!(analysis.drained, 0);
    Ok(())
}

#[test]
fn test_full_ingest_drops_and_capacity_recovers() -> TestResult {
    let mut graph = graph_with(1_000, 10_000, 50, 4)?;
    let sink = graph.sink();

    let accepted = (0..6).filter(|&t| sink.register_event(TimedEvent::instant(t))).count();
    assert_eq!(accepted, 4);
    assert_eq!(graph.counters().ingest.dropped, 2);

    // Far in the future: everything drains and expires in the same pass.
    graph.set_sync_time(1_000_000);
    assert_eq!(graph.analyse().expired, 4);
    assert_eq!(graph.retained_len(), 0);

    let accepted = (10..14).filter(|&t| sink.register_event(TimedEvent::instant(t))).count();
    assert_eq!(accepted, 4);
    Ok(())
}

#[test]
fn test_retained_events_keep_publish_order() -> TestResult {
    let mut graph = scenario_graph()?;
    let ticks = jittered(0, 100, &[0, 7, -3, 12, 0, -9]);
    publish(&graph, &ticks);
    graph.set_sync_time(1_000);
    graph.analyse();

    let begins: Vec<i64> = graph.retained().map(|event| event.begin).collect();
    assert_eq!(begins, ticks);
    Ok(())
}

#[test]
fn test_events_accumulate_across_frames() -> TestResult {
    let mut graph = scenario_graph()?;
    for (frame, tick) in [100, 200, 300].into_iter().enumerate() {
        publish(&graph, &[tick]);
        graph.set_sync_time(tick);
        assert_eq!(graph.analyse().samples(), frame as u64);
    }
    assert_eq!(graph.retained_len(), 3);
    Ok(())
}

#[test]
fn test_summary_serializes() -> TestResult {
    let mut graph = scenario_graph()?;
    publish(&graph, &[0, 100, 205, 400]);
    graph.set_sync_time(500);
    graph.analyse();

    let json = serde_json::to_value(graph.summary())?;
    assert_eq!(json["name"], "test");
    assert_eq!(json["samples"], 3);
    assert_eq!(json["frequency_hz"], 1);
    assert_eq!(json["bars"], 4);
    Ok(())
}

#[test]
fn test_text_canvas_paint_draws_bars_and_text() -> TestResult {
    let mut graph = scenario_graph()?;
    publish(&graph, &[0, 100, 205, 400]);
    graph.set_sync_time(500);

    let mut canvas = TextCanvas::new(40, 7);
    graph.set_bounds(canvas.bounds());
    graph.paint(&mut canvas);

    let rendered = canvas.render();
    assert!(rendered.contains("Freq: 1Hz"));
    assert!(rendered.contains('#'));
    assert!(rendered.starts_with("+---"));
    Ok(())
}
