//! Event source threads.
//!
//! The timer thread sleeps a fixed period between events, so its intervals
//! drift with scheduler latency. The high-resolution thread keeps absolute
//! deadlines and spins out the last stretch of each wait. Every
//! high-resolution tick also wakes the async updater through a one-slot
//! channel; wake-ups arriving while one is pending coalesce.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender, TrySendError};
use tickscope_graph::{EventSink, Monitor, SourceKind};
use tracing::{debug, info};

use crate::error::CliError;

/// Portion of each high-resolution wait spent spinning instead of sleeping.
const SPIN_MARGIN: Duration = Duration::from_micros(200);

/// Periods of the background sources.
#[derive(Debug, Clone, Copy)]
pub struct SourcePeriods {
    pub timer: Duration,
    pub high_resolution: Duration,
}

/// Running background sources.
#[derive(Debug)]
pub struct SourceThreads {
    stop: Arc<AtomicBool>,
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl SourceThreads {
    /// Start a thread for every background source the monitor shows.
    ///
    /// The high-resolution thread also runs when only the async updater is
    /// shown, since it is what wakes the updater.
    pub fn spawn(monitor: &Monitor, periods: SourcePeriods) -> Result<Self, CliError> {
        let stop = Arc::new(AtomicBool::new(false));
        let mut threads = Self {
            stop: Arc::clone(&stop),
            handles: Vec::new(),
        };

        if let Some(sink) = monitor.sink(SourceKind::Timer) {
            let stop = Arc::clone(&stop);
            threads.start(SourceKind::Timer, move || {
                run_timer(&sink, periods.timer, &stop);
            })?;
        }

        let hires = monitor.sink(SourceKind::HighResTimer);
        let wake = monitor.sink(SourceKind::AsyncUpdate).map(|sink| {
            let (tx, rx) = channel::bounded(1);
            (sink, tx, rx)
        });

        let (wake_tx, updater) = match wake {
            Some((sink, tx, rx)) => (Some(tx), Some((sink, rx))),
            None => (None, None),
        };

        if let Some((sink, rx)) = updater {
            threads.start(SourceKind::AsyncUpdate, move || run_async_updater(&sink, &rx))?;
        }

        if hires.is_some() || wake_tx.is_some() {
            let stop = Arc::clone(&stop);
            let period = periods.high_resolution;
            threads.start(SourceKind::HighResTimer, move || {
                run_high_resolution(hires.as_ref(), wake_tx, period, &stop);
            })?;
        }

        info!(threads = threads.handles.len(), "sources started");
        Ok(threads)
    }

    fn start<F>(&mut self, kind: SourceKind, body: F) -> Result<(), CliError>
    where
        F: FnOnce() + Send + 'static,
    {
        let name = kind.display_name();
        let handle = thread::Builder::new()
            .name(format!("tickscope-{name}"))
            .spawn(body)
            .map_err(CliError::Spawn)?;
        self.handles.push((name, handle));
        Ok(())
    }

    /// Signal every thread to stop and wait for them.
    pub fn stop(self) -> Result<(), CliError> {
        self.stop.store(true, Ordering::Release);
        let mut first_panic = None;
        for (name, handle) in self.handles {
            if handle.join().is_err() && first_panic.is_none() {
                first_panic = Some(name);
            }
        }
        debug!("sources stopped");
        first_panic.map_or(Ok(()), |name| Err(CliError::SourcePanicked(name)))
    }
}

fn run_timer(sink: &EventSink, period: Duration, stop: &AtomicBool) {
    while !stop.load(Ordering::Acquire) {
        thread::sleep(period);
        sink.register_now();
    }
}

fn run_high_resolution(
    sink: Option<&EventSink>,
    wake: Option<Sender<()>>,
    period: Duration,
    stop: &AtomicBool,
) {
    let mut deadline = Instant::now() + period;
    while !stop.load(Ordering::Acquire) {
        wait_until(deadline);

        if let Some(sink) = sink {
            sink.register_now();
        }
        if let Some(wake) = &wake {
            match wake.try_send(()) {
                Ok(()) | Err(TrySendError::Full(())) => {}
                Err(TrySendError::Disconnected(())) => break,
            }
        }

        deadline += period;
        let now = Instant::now();
        if deadline < now {
            // Fell behind; skip the missed ticks instead of bursting.
            deadline = now + period;
        }
    }
}

/// Ends when the high-resolution thread drops its sender.
fn run_async_updater(sink: &EventSink, wake: &Receiver<()>) {
    for () in wake {
        sink.register_now();
    }
}

fn wait_until(deadline: Instant) {
    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining > SPIN_MARGIN {
        thread::sleep(remaining.saturating_sub(SPIN_MARGIN));
    }
    while Instant::now() < deadline {
        std::hint::spin_loop();
    }
}
