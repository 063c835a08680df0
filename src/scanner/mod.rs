//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Name-based filtering of files and directories
//! - Depth-first directory walking using walkdir
//! - Content fingerprinting with SHA-256 or BLAKE3
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`filter`]: Pure accept/reject/skip-subtree decisions
//! - [`walker`]: Directory traversal and candidate discovery
//! - [`hasher`]: Streaming file fingerprinting
//!
//! # Example
//!
//! ```no_run
//! use hashstore::pipeline::Counters;
//! use hashstore::scanner::{Hasher, PathFilter, Walker};
//! use std::path::PathBuf;
//!
//! let filter = PathFilter::default();
//! let counters = Counters::new();
//! let walker = Walker::new(vec![PathBuf::from("/photos")], &filter, &counters);
//! let hasher = Hasher::default();
//!
//! for candidate in walker.walk() {
//!     let candidate = candidate.expect("walk failed");
//!     let fingerprint = hasher.full_hash(&candidate.path).expect("hash failed");
//!     println!("{} {}", candidate.path.display(), fingerprint[0]);
//! }
//! ```

pub mod filter;
pub mod hasher;
pub mod walker;

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

// Re-export main types
pub use filter::{lowercase_extension, store_extension, FilterDecision, PathFilter, SkipReason};
pub use hasher::{hash_to_hex, Fingerprint, HashAlgorithm, Hasher};
pub use walker::Walker;

/// A file accepted by the walker and waiting to be hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Path to the file, as discovered under its input root
    pub path: PathBuf,
    /// Base name of the file, lossily decoded for matching and logging
    pub name: String,
    /// Lowercase extension including the leading dot, or empty.
    /// Raw bytes of the name are preserved.
    pub extension: OsString,
}

impl FileCandidate {
    /// Build a candidate from a path, deriving name and extension.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        let file_name = path.file_name().unwrap_or_default();
        let name = file_name.to_string_lossy().into_owned();
        let extension = store_extension(file_name);
        Self {
            path,
            name,
            extension,
        }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Reading a directory or its entries failed.
    #[error("failed to read {path}")]
    Walk {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying walk error
        #[source]
        source: walkdir::Error,
    },
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl HashError {
    pub(crate) fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
