//! Concurrency tests for tickscope-graph.
//!
//! Producers publish from their own threads while the test thread plays
//! the frame driver.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tickscope_graph::prelude::*;
use tickscope_test_helpers::assert_sorted;
use tickscope_test_helpers::prelude::*;

#[test]
fn test_producer_thread_while_consumer_analyses() -> TestResult {
    let config = GraphConfig::builder()
        .capacity(1 << 16)
        .clock_rate(1_000_000)
        .visible_window_ticks(1_000)
        .analysis_horizon_ticks(i64::MAX / 4)
        .build()?;
    let mut graph = Graph::with_clock("worker", config, Arc::new(ManualClock::new(1_000_000)))?;
    let sink = graph.sink();
    let total: i64 = 20_000;

    let producer = thread::spawn(move || {
        for tick in 0..total {
            assert!(sink.register_event(TimedEvent::instant(tick)));
        }
        ProducerTag::current()
    });

    graph.set_sync_time(total);
    let mut drained = 0;
    while !producer.is_finished() {
        drained += graph.analyse().drained;
        thread::yield_now();
    }
    let tag = must(producer.join().map_err(|_| "producer panicked"));
    drained += graph.analyse().drained;

    assert_eq!(drained, 20_000);
    assert_eq!(graph.last_producer(), tag);
    assert_ne!(tag, ProducerTag::current());

    let begins: Vec<i64> = graph.retained().map(|event| event.begin).collect();
    assert_eq!(begins.len(), 20_000);
    assert_sorted!(&begins);
    assert_eq!(graph.last_analysis().samples(), 19_999);
    Ok(())
}

#[test]
fn test_stalled_consumer_drops_newest() -> TestResult {
    let config = GraphConfig::builder()
        .capacity(16)
        .clock_rate(1_000_000)
        .visible_window_ticks(1_000)
        .analysis_horizon_ticks(10_000)
        .build()?;
    let mut graph = Graph::with_clock("stalled", config, Arc::new(ManualClock::new(1_000_000)))?;
    let sink = graph.sink();

    let accepted = thread::spawn(move || (0..100).filter(|&t| sink.register_event(TimedEvent::instant(t))).count());
    let accepted = must(accepted.join().map_err(|_| "producer panicked"));

    assert_eq!(accepted, 16);
    assert_eq!(graph.counters().ingest.dropped, 84);

    graph.set_sync_time(100);
    graph.analyse();
    let begins: Vec<i64> = graph.retained().map(|event| event.begin).collect();
    assert_eq!(begins, (0..16).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn test_monitor_with_real_sources() -> TestResult {
    let mut monitor = Monitor::new(MonitorConfig::default(), Arc::new(MonotonicClock))?;
    let mut canvas = TextCanvas::new(100, 42);
    monitor.layout(canvas.bounds());

    let spawn_source = |kind: SourceKind| {
        let sink = monitor.sink(kind);
        thread::spawn(move || {
            let Some(sink) = sink else {
                return 0;
            };
            (0..20)
                .filter(|_| {
                    thread::sleep(Duration::from_millis(1));
                    sink.register_now()
                })
                .count()
        })
    };
    let timer = spawn_source(SourceKind::Timer);
    let hi_res = spawn_source(SourceKind::HighResTimer);

    for _ in 0..5 {
        monitor.on_vblank();
        monitor.paint(&mut canvas);
        thread::sleep(Duration::from_millis(2));
    }
    assert_eq!(must(timer.join().map_err(|_| "timer panicked")), 20);
    assert_eq!(must(hi_res.join().map_err(|_| "hi-res panicked")), 20);

    monitor.on_vblank();
    monitor.paint(&mut canvas);

    let summaries = monitor.summaries();
    let samples = |name: &str| {
        summaries
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.samples)
    };
    assert_eq!(samples("Timer"), Some(19));
    assert_eq!(samples("HighResolutionTimer"), Some(19));
    assert_eq!(samples("VBlank"), Some(5));
    assert!(samples("paint").is_some_and(|n| n >= 4));
    assert!(canvas.render().contains("AsyncUpdater"));
    Ok(())
}
