//! Directory walker implementation using walkdir for depth-first traversal.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct, which traverses one or more
//! input roots and yields a [`FileCandidate`] for every regular file the
//! [`PathFilter`] accepts. Every rejection is counted as skipped and logged
//! with its reason; rejected directories are pruned without being read.
//!
//! Traversal is single-threaded so that the skipped and processed counters
//! have exactly one writer. Parallelism lives in the hashing stage instead.
//!
//! # Features
//!
//! - Depth-first traversal of multiple roots
//! - Subtree pruning on skip-dir matches
//! - Symlinks and special files are never yielded
//! - Optional exclusion of the output store when it sits inside an input
//! - Early stop via a shared shutdown flag
//!
//! # Example
//!
//! ```no_run
//! use hashstore::pipeline::Counters;
//! use hashstore::scanner::{PathFilter, Walker};
//! use std::path::PathBuf;
//!
//! let filter = PathFilter::default();
//! let counters = Counters::new();
//! let walker = Walker::new(vec![PathBuf::from("/home/user/Pictures")], &filter, &counters);
//!
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}", file.path.display()),
//!         Err(e) => eprintln!("Fatal: {}", e),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use walkdir::{DirEntry, WalkDir};

use super::{FileCandidate, FilterDecision, PathFilter, ScanError, SkipReason};
use crate::pipeline::Counters;
use crate::progress::ProgressCallback;

/// Directory walker for candidate discovery.
pub struct Walker<'a> {
    /// Root paths to walk, in order
    roots: Vec<PathBuf>,
    /// Name-based filter
    filter: &'a PathFilter,
    /// Shared run counters (skipped and processed are written here)
    counters: &'a Counters,
    /// Directory never descended into, typically the output store
    excluded: Option<PathBuf>,
    /// Optional shutdown flag for early termination
    shutdown_flag: Option<&'a AtomicBool>,
    /// Optional progress observer
    progress: Option<&'a dyn ProgressCallback>,
}

impl<'a> Walker<'a> {
    /// Create a new walker over the given roots.
    ///
    /// # Arguments
    ///
    /// * `roots` - Directories to traverse
    /// * `filter` - Filter applied at every node, including the roots
    /// * `counters` - Counters receiving skipped and processed events
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, filter: &'a PathFilter, counters: &'a Counters) -> Self {
        Self {
            roots,
            filter,
            counters,
            excluded: None,
            shutdown_flag: None,
            progress: None,
        }
    }

    /// Never descend into `path`.
    ///
    /// The comparison is on the path as produced by traversal, so callers
    /// should pass canonical roots and a canonical `path`.
    #[must_use]
    pub fn with_excluded(mut self, path: PathBuf) -> Self {
        self.excluded = Some(path);
        self
    }

    /// Set the shutdown flag.
    ///
    /// When the flag is set to `true`, iteration ends at the next entry.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Report skip and accept events to a progress observer.
    #[must_use]
    pub fn with_progress(mut self, progress: &'a dyn ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .is_some_and(|f| f.load(Ordering::Acquire))
    }

    /// Walk every root in turn, yielding accepted files.
    ///
    /// Each accepted file increments the processed counter as it is yielded.
    /// A directory read error is yielded as [`ScanError`]; callers treat it
    /// as fatal and stop iterating.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileCandidate, ScanError>> + '_ {
        self.roots
            .iter()
            .flat_map(move |root| {
                WalkDir::new(root)
                    .follow_links(false)
                    .into_iter()
                    .filter_entry(move |entry| self.admit(entry))
                    .filter_map(move |result| match result {
                        Ok(entry) if entry.file_type().is_file() => {
                            self.counters.record_processed();
                            if let Some(progress) = self.progress {
                                progress.on_file_accepted(entry.path());
                            }
                            Some(Ok(FileCandidate::new(entry.into_path())))
                        }
                        // Admitted directories are only traversed
                        Ok(_) => None,
                        Err(e) => Some(Err(self.handle_walk_error(root, e))),
                    })
            })
            .take_while(move |_| !self.is_shutdown_requested())
    }

    /// Apply the filter to an entry, recording the skip if rejected.
    ///
    /// Returning `false` for a directory prunes its whole subtree.
    fn admit(&self, entry: &DirEntry) -> bool {
        match self.classify(entry) {
            None => true,
            Some(reason) => {
                self.record_skip(entry.path(), reason);
                false
            }
        }
    }

    fn classify(&self, entry: &DirEntry) -> Option<SkipReason> {
        let file_type = entry.file_type();
        if file_type.is_symlink() {
            return Some(SkipReason::Symlink);
        }

        let name = entry.file_name().to_string_lossy();
        let decision = if file_type.is_dir() {
            if self.is_excluded(entry.path()) {
                return Some(SkipReason::OutputStore);
            }
            self.filter.check(&name, true)
        } else if file_type.is_file() {
            self.filter.check(&name, false)
        } else {
            return Some(SkipReason::Special);
        };

        match decision {
            FilterDecision::Reject(reason) => Some(reason),
            FilterDecision::Accept | FilterDecision::Descend => None,
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        self.excluded.as_deref() == Some(path)
    }

    fn record_skip(&self, path: &Path, reason: SkipReason) {
        self.counters.record_skipped();
        log::debug!("skipping {} ({})", path.display(), reason);
        if let Some(progress) = self.progress {
            progress.on_file_skipped(path, reason);
        }
    }

    /// Convert a walkdir error into a fatal scan error.
    fn handle_walk_error(&self, root: &Path, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
        log::error!("walk failed at {}: {}", path.display(), error);
        ScanError::Walk {
            path,
            source: error,
        }
    }
}
