//! Run counters.
//!
//! `skipped` and `processed` have a single writer (the traversal thread) and
//! `duplicates` is written by every worker. All three are atomics so that
//! ownership changes can never turn into a data race; the single-writer
//! discipline is still what the pipeline follows.
//!
//! Values are only meaningful once every worker has been joined, which is
//! when [`Counters::snapshot`] is called.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Live counters for one run.
#[derive(Debug, Default)]
pub struct Counters {
    skipped: AtomicU64,
    processed: AtomicU64,
    duplicates: AtomicU64,
}

impl Counters {
    /// Create zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An entry was rejected by the filter (a pruned subtree counts once).
    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// A file was accepted and handed to the worker pool.
    pub fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    /// A placement found its store path already taken.
    pub fn record_duplicate(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all three totals.
    ///
    /// Relaxed loads are enough here: the caller reads after joining the
    /// worker threads, and the join synchronizes with every prior increment.
    #[must_use]
    pub fn snapshot(&self) -> Summary {
        Summary {
            skipped: self.skipped.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
        }
    }
}

/// Final totals of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Entries rejected by filtering
    pub skipped: u64,
    /// Files accepted for hashing
    pub processed: u64,
    /// Files whose content already had a link in the store
    pub duplicates: u64,
}

impl Summary {
    /// Files that produced a new link in the store.
    #[must_use]
    pub fn linked(&self) -> u64 {
        self.processed.saturating_sub(self.duplicates)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Skipped: {}, Files: {}, Duplicates: {}",
            self.skipped, self.processed, self.duplicates
        )
    }
}
