//! hashstore - Content-Addressed Hard-Link Store
//!
//! Deduplicates one or more directory trees by content. Every accepted file
//! is hashed and hard-linked into an output store under a name derived from
//! its fingerprint, so byte-identical files collapse onto one physical copy.
//! Once a run completes, the inputs can be deleted: the store still holds a
//! link to every unique piece of content.
//!
//! Runs are idempotent. Re-running over the same inputs only finds
//! duplicates, which makes an aborted run safe to simply repeat.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod progress;
pub mod scanner;
pub mod store;

use anyhow::{Context, Result};

use crate::cli::{Cli, SummaryFormat};
use crate::config::{Config, PipelineConfig};
use crate::error::ExitCode;
use crate::pipeline::Summary;
use crate::progress::Progress;

/// Run the application with parsed CLI arguments.
///
/// On success, prints exactly one summary line to stdout.
///
/// # Errors
///
/// Returns an error for invalid configuration or any fatal condition during
/// the run. No summary is printed in that case.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet, cli.no_color);

    let settings = Config::load(cli.config.as_deref())?.apply_cli(&cli);
    log::debug!("Effective settings: {:?}", settings);

    let config = PipelineConfig::new(&settings, cli.output.clone(), cli.inputs.clone())?;

    let progress = Progress::new(cli.quiet || cli.no_progress);
    let summary = pipeline::run(&config, Some(&progress)).context("run aborted")?;

    println!("{}", format_summary(&summary, cli.format)?);
    Ok(ExitCode::Success)
}

/// Render the summary line in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_summary(summary: &Summary, format: SummaryFormat) -> Result<String> {
    Ok(match format {
        SummaryFormat::Text => summary.to_string(),
        SummaryFormat::Json => serde_json::to_string(summary)?,
    })
}
