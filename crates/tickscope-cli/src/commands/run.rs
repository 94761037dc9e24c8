//! Run the sources against a frame-paced monitor.

use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use tickscope_graph::{GraphConfig, Monitor, MonitorConfig, MonotonicClock, TextCanvas, TickClock};
use tracing::{debug, info};

use super::RunArgs;
use crate::error::CliError;
use crate::output::{self, RunReport};
use crate::sources::{SourcePeriods, SourceThreads};

/// Character rows given to the header and to each graph.
const ROWS_PER_GRAPH: usize = 7;

const MIN_WIDTH: usize = 40;
const MAX_WIDTH: usize = 1_000;
const MAX_SECONDS: f64 = 86_400.0;
const MAX_FPS: u32 = 1_000;
const MIN_HIRES_US: u64 = 50;

/// Headroom over the expected number of retained events.
const CAPACITY_HEADROOM: f64 = 1.25;

pub fn execute(args: &RunArgs, json: bool) -> Result<()> {
    let run_for = args.validate()?;

    let clock: Arc<dyn TickClock> = Arc::new(MonotonicClock);
    let config = load_config(args.config.as_deref(), clock.ticks_per_second())?;
    check_capacity(&config.graph, args)?;

    let mut monitor = Monitor::new(config, Arc::clone(&clock)).map_err(CliError::from)?;
    monitor.set_info(info_lines(args, clock.as_ref()));

    let rows = (monitor.sources().count() + 1) * ROWS_PER_GRAPH;
    let mut canvas = TextCanvas::new(args.width, rows);
    monitor.layout(canvas.bounds());

    let threads = SourceThreads::spawn(&monitor, args.periods())?;
    let frames = run_frames(&mut monitor, &mut canvas, args, run_for, json);
    threads.stop()?;
    let (frames, elapsed) = frames?;

    info!(frames, elapsed_ms = elapsed.as_millis(), "run finished");

    let summaries = monitor.summaries();
    if json {
        output::print_report_json(&RunReport {
            frame: frames,
            elapsed_seconds: elapsed.as_secs_f64(),
            final_report: true,
            graphs: &summaries,
        })?;
    } else {
        if args.draw {
            output::print_frame(&canvas);
        }
        output::print_summary_table(&summaries, elapsed);
    }
    Ok(())
}

impl RunArgs {
    /// Check the arguments and return the run duration.
    pub fn validate(&self) -> Result<Duration, CliError> {
        if !(self.seconds > 0.0 && self.seconds <= MAX_SECONDS) {
            return Err(CliError::InvalidConfiguration(format!(
                "seconds must be in (0, {MAX_SECONDS}], got {}",
                self.seconds
            )));
        }
        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(CliError::InvalidConfiguration(format!(
                "fps must be in 1..={MAX_FPS}, got {}",
                self.fps
            )));
        }
        if self.timer_ms == 0 {
            return Err(CliError::InvalidConfiguration(
                "timer-ms must be positive".into(),
            ));
        }
        if self.hires_us < MIN_HIRES_US {
            return Err(CliError::InvalidConfiguration(format!(
                "hires-us must be at least {MIN_HIRES_US}, got {}",
                self.hires_us
            )));
        }
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&self.width) {
            return Err(CliError::InvalidConfiguration(format!(
                "width must be in {MIN_WIDTH}..={MAX_WIDTH}, got {}",
                self.width
            )));
        }

        Duration::try_from_secs_f64(self.seconds)
            .map_err(|e| CliError::InvalidConfiguration(format!("seconds: {e}")))
    }

    fn periods(&self) -> SourcePeriods {
        SourcePeriods {
            timer: Duration::from_millis(self.timer_ms),
            high_resolution: Duration::from_micros(self.hires_us),
        }
    }

    fn frame_period(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }

    /// Highest event rate of any source, in events per second.
    fn peak_rate(&self) -> f64 {
        let timer = 1_000.0 / self.timer_ms.max(1) as f64;
        let hires = 1_000_000.0 / self.hires_us.max(1) as f64;
        timer.max(hires).max(f64::from(self.fps))
    }
}

fn load_config(path: Option<&Path>, ticks_per_second: i64) -> Result<MonitorConfig, CliError> {
    let Some(path) = path else {
        return Ok(MonitorConfig::for_clock_rate(ticks_per_second));
    };
    let text = fs::read_to_string(path)?;
    let config = MonitorConfig::from_json(&text)?;
    info!(path = %path.display(), sources = config.sources.len(), "configuration loaded");
    Ok(config)
}

/// Reject configurations whose rings cannot hold a full analysis horizon
/// of the fastest source.
fn check_capacity(config: &GraphConfig, args: &RunArgs) -> Result<(), CliError> {
    let horizon = config.ticks_to_ms(config.analysis_horizon_ticks) / 1_000.0;
    let frame = args.frame_period().as_secs_f64();
    let needed = args.peak_rate() * (horizon + frame) * CAPACITY_HEADROOM;

    debug!(capacity = config.capacity, needed, "capacity check");
    if needed > config.capacity as f64 {
        return Err(CliError::InvalidConfiguration(format!(
            "graph capacity {} cannot hold the {needed:.0} events the fastest source \
             produces over the analysis horizon; raise graph.capacity or slow the source",
            config.capacity
        )));
    }
    Ok(())
}

fn info_lines(args: &RunArgs, clock: &dyn TickClock) -> Vec<String> {
    let build = if cfg!(debug_assertions) { "debug" } else { "release" };
    let cores = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    vec![
        format!("tickscope {}", env!("CARGO_PKG_VERSION")),
        format!("Build: {build}"),
        format!("Arch: {}", std::env::consts::ARCH),
        format!("OS: {}", std::env::consts::OS),
        format!("Cores: {cores}"),
        format!("Clock: {} ticks/s", clock.ticks_per_second()),
        format!("Frame rate: {}Hz", args.fps),
        format!("Timer: {}ms", args.timer_ms),
        format!("Hi-res timer: {}us", args.hires_us),
    ]
}

/// Pace frames until `run_for` has elapsed. Returns the frame count and
/// the elapsed time.
fn run_frames(
    monitor: &mut Monitor,
    canvas: &mut TextCanvas,
    args: &RunArgs,
    run_for: Duration,
    json: bool,
) -> Result<(u64, Duration), CliError> {
    let period = args.frame_period();
    let report_every = u64::from(args.fps);
    let start = Instant::now();
    let end = start + run_for;

    let mut deadline = start;
    let mut frames: u64 = 0;
    loop {
        deadline += period;
        if deadline > end {
            break;
        }
        thread::sleep(deadline.saturating_duration_since(Instant::now()));

        monitor.on_vblank();
        canvas.clear();
        monitor.paint(canvas);
        frames += 1;

        if frames.is_multiple_of(report_every) {
            let summaries = monitor.summaries();
            if json {
                output::print_report_json(&RunReport {
                    frame: frames,
                    elapsed_seconds: start.elapsed().as_secs_f64(),
                    final_report: false,
                    graphs: &summaries,
                })?;
            } else if args.draw {
                output::print_frame(canvas);
            }
        }
    }

    Ok((frames, start.elapsed()))
}
