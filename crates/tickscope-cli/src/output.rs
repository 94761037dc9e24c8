//! Output formatting for CLI responses

use std::time::Duration;

use anyhow::Error;
use colored::Colorize;
use serde::Serialize;
use serde_json::json;
use tickscope_graph::{FrameSummary, TextCanvas};

use crate::error::CliError;

/// One JSON report line.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    /// Frames painted so far.
    pub frame: u64,
    /// Seconds since the first frame was scheduled.
    pub elapsed_seconds: f64,
    /// Whether this is the closing report of the run.
    pub final_report: bool,
    /// Per-source summaries, top to bottom.
    pub graphs: &'a [FrameSummary],
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "exit_code": error.downcast_ref::<CliError>().map_or(1, CliError::exit_code),
        }
    });
    match serde_json::to_string(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// Print a report as a single JSON line.
pub fn print_report_json(report: &RunReport<'_>) -> Result<(), CliError> {
    println!("{}", serde_json::to_string(report)?);
    Ok(())
}

/// Print the drawn monitor.
pub fn print_frame(canvas: &TextCanvas) {
    print!("{canvas}");
    println!("{}", "-".repeat(canvas.columns()).dimmed());
}

/// Print one row per source with a heading.
pub fn print_summary_table(summaries: &[FrameSummary], elapsed: Duration) {
    println!(
        "{}",
        format!("Ran for {:.2}s", elapsed.as_secs_f64()).bold()
    );
    println!("{}", table_header().bold());
    for summary in summaries {
        let row = summary.table_row();
        if summary.dropped > 0 || summary.truncated > 0 {
            println!("{}", row.yellow());
        } else {
            println!("{row}");
        }
    }
}

/// Column headings aligned with [`FrameSummary::table_row`].
fn table_header() -> String {
    format!(
        "{:<20} {:>8} {:>9} {:>9} {:>9} {:>9} {:>7}",
        "Source", "Freq", "Min ms", "Max ms", "Avg ms", "SD ms", "Dropped"
    )
}
