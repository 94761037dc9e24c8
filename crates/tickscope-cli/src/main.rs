//! tickscope - live jitter monitor
//!
//! Runs a set of timing sources (a sleeping timer, a high-resolution
//! timer and an async updater it wakes) against a frame-paced render loop
//! and reports the interval statistics of each.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;
mod sources;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::RunArgs;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "tickscope")]
#[command(about = "Measure callback jitter of timers, async updates and frame refresh")]
#[command(version)]
#[command(long_about = "
tickscope drives a timer thread, a high-resolution timer thread and an async
updater woken by it, while the main loop paces frames like a display refresh.
Every source registers timestamped events; each frame the events of the last
two seconds are reduced to interval statistics and drawn as a timeline.

Use --json for one JSON object per report, suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the sources and report their jitter
    Run(RunArgs),

    /// Print the default monitor configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("tickscope={log_level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let result = execute_command(&cli);

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let exit_code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            std::process::exit(exit_code);
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Run(args) => commands::run::execute(args, cli.json),
        Commands::Config => commands::config::execute(),
    }
}
