//! Command implementations for the tickscope CLI

pub mod config;
pub mod run;

use std::path::PathBuf;

use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// How long to run, in seconds
    #[arg(long, default_value_t = 5.0)]
    pub seconds: f64,

    /// Frame rate of the refresh loop
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Period of the sleeping timer, in milliseconds
    #[arg(long, default_value_t = 10)]
    pub timer_ms: u64,

    /// Period of the high-resolution timer, in microseconds
    #[arg(long, default_value_t = 1_000)]
    pub hires_us: u64,

    /// Width of the drawn timeline, in characters
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Print the drawn monitor once per second
    #[arg(long)]
    pub draw: bool,

    /// Monitor configuration file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
