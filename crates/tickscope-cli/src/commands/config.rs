//! Print the default monitor configuration.

use anyhow::Result;
use tickscope_graph::{MonitorConfig, MonotonicClock};

use crate::error::CliError;

pub fn execute() -> Result<()> {
    println!("{}", default_config_json()?);
    Ok(())
}

/// Default configuration for the monotonic clock, as pretty JSON.
fn default_config_json() -> Result<String, CliError> {
    Ok(MonitorConfig::for_clock_rate(MonotonicClock::TICKS_PER_SECOND).to_json_pretty()?)
}
