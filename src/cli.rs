//! Command-line interface definitions for hashstore.
//!
//! This module defines all CLI arguments using the clap derive API. Filter
//! and pool options are optional here: when absent, the value comes from the
//! config file, the environment, or the built-in default (see
//! [`crate::config`]).
//!
//! # Example
//!
//! ```bash
//! # Link two photo libraries into a store
//! hashstore /mnt/store ~/Pictures /mnt/old-laptop/Pictures
//!
//! # Only JPEGs, 4 workers, BLAKE3 fingerprints
//! hashstore --extension '^\.jpe?g$' -p 4 --hash blake3 /mnt/store ~/Pictures
//!
//! # Machine-readable summary
//! hashstore --format json /mnt/store ~/Pictures
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::scanner::HashAlgorithm;

/// Deduplicate directory trees into a content-addressed hard-link store.
///
/// Every matching file is hashed and hard-linked into OUTPUT as
/// `<shard>/<hash><ext>`. Identical files end up as one physical copy, and the
/// inputs can be deleted afterwards without losing any content.
#[derive(Debug, Parser)]
#[command(name = "hashstore")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Store directory (must exist)
    #[arg(value_name = "OUTPUT", value_parser = parse_existing_dir)]
    pub output: PathBuf,

    /// Input directories to deduplicate (must exist)
    #[arg(value_name = "INPUT", required = true, value_parser = parse_existing_dir)]
    pub inputs: Vec<PathBuf>,

    /// Number of hashing workers [default: 16]
    #[arg(short, long, value_name = "N", value_parser = parse_parallelism)]
    pub parallelism: Option<usize>,

    /// Regex matched against the lowercase file extension, including the dot
    /// [default: (jpg|jpeg|tiff|png|avi|mpg|mp4|mov|3gp)]
    #[arg(long, value_name = "REGEX")]
    pub extension: Option<String>,

    /// Regex matched against file names to skip [default: \.jpg_face(\d+)\.]
    #[arg(long, value_name = "REGEX")]
    pub skip_file: Option<String>,

    /// Regex matched against directory names to skip with their contents
    /// [default: ^(Thumbnails|derivatives|Previews|face)$]
    #[arg(long, value_name = "REGEX")]
    pub skip_dir: Option<String>,

    /// Fingerprint algorithm [default: sha256]
    ///
    /// Use the same algorithm for every run against one store.
    #[arg(long, value_enum, value_name = "ALGORITHM")]
    pub hash: Option<HashAlgorithm>,

    /// Path to a TOML config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Summary line format
    #[arg(long, value_enum, default_value = "text")]
    pub format: SummaryFormat,

    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress: bool,

    /// Report fatal errors as a JSON object on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and the summary
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,
}

/// Format of the final summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    /// `Skipped: n, Files: n, Duplicates: n`
    Text,
    /// Single-line JSON object
    Json,
}

/// Parse a worker count, rejecting zero.
///
/// # Examples
///
/// ```
/// use hashstore::cli::parse_parallelism;
///
/// assert_eq!(parse_parallelism("8").unwrap(), 8);
/// assert!(parse_parallelism("0").is_err());
/// ```
///
/// # Errors
///
/// Returns an error if the value is not a positive integer.
pub fn parse_parallelism(s: &str) -> Result<usize, String> {
    let n: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: '{s}'"))?;
    if n == 0 {
        return Err("Parallelism must be at least 1".to_string());
    }
    Ok(n)
}

/// Accept a path only if it names an existing directory.
///
/// # Errors
///
/// Returns an error if the path does not exist or is not a directory.
pub fn parse_existing_dir(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if !path.exists() {
        return Err(format!("Path not found: '{s}'"));
    }
    if !path.is_dir() {
        return Err(format!("Not a directory: '{s}'"));
    }
    Ok(path)
}
