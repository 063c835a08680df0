//! Logging infrastructure for hashstore.
//!
//! Structured logging uses the `log` facade and the `env_logger` backend.
//! Log levels are determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (error only) or `--verbose` (debug/trace)
//! 3. Default: info level
//!
//! Per-file events (skips, placements, duplicates) are logged at debug, so a
//! default run only shows start, end and fatal diagnostics. Logs go to stderr;
//! stdout is reserved for the summary line.

use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize the logging subsystem based on CLI flags.
///
/// Must be called at most once per process.
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=info, 1=debug, 2+=trace)
/// * `quiet` - If true, only show errors (overridden by RUST_LOG)
/// * `no_color` - Disable ANSI styling of the level
pub fn init_logging(verbose: u8, quiet: bool, no_color: bool) {
    let mut builder = Builder::new();
    builder.target(Target::Stderr);

    if env::var_os("RUST_LOG").is_some() {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    if no_color {
        builder.write_style(WriteStyle::Never);
    }

    builder.format(move |buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        if verbose >= 1 {
            writeln!(
                buf,
                "{} {style}{:<5}{style:#} [{}] {}",
                buf.timestamp_millis(),
                level,
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
        }
    });

    // A second init (e.g. from tests) is harmless; keep the first logger.
    if builder.try_init().is_ok() {
        log::debug!("Logging initialized at level: {:?}", log::max_level());
    }
}

/// Determine the log level from CLI flags.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
