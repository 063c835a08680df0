//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements [`ProgressCallback`]
//! to display a spinner in the terminal while a run is in flight. The pipeline
//! only ever talks to the trait, so library callers can plug in their own
//! observer or none at all.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::scanner::SkipReason;
use crate::store::Placement;

/// Progress callback for pipeline events.
///
/// Methods are called from the traversal thread (`on_file_accepted`,
/// `on_file_skipped`) and from worker threads (`on_file_placed`), so
/// implementations must be thread-safe.
pub trait ProgressCallback: Send + Sync {
    /// A file passed the filter and is about to be hashed.
    fn on_file_accepted(&self, _path: &Path) {}

    /// An entry was rejected; for directories the whole subtree is skipped.
    fn on_file_skipped(&self, _path: &Path, _reason: SkipReason) {}

    /// A file was hashed and placed into the store.
    fn on_file_placed(&self, _path: &Path, _placement: &Placement) {}

    /// The run is over, successfully or not.
    fn on_finish(&self) {}
}

/// Terminal spinner showing how many files have been placed.
pub struct Progress {
    bar: ProgressBar,
    skipped: AtomicU64,
    duplicates: AtomicU64,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, nothing is drawn.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashstore::progress::Progress;
    ///
    /// let progress = Progress::new(true);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
            bar.set_style(Self::style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };

        Self {
            bar,
            skipped: AtomicU64::new(0),
            duplicates: AtomicU64::new(0),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos} files placed {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn refresh_message(&self) {
        self.bar.set_message(format!(
            "({} duplicates, {} skipped)",
            self.duplicates.load(Ordering::Relaxed),
            self.skipped.load(Ordering::Relaxed)
        ));
    }
}

impl ProgressCallback for Progress {
    fn on_file_skipped(&self, _path: &Path, _reason: SkipReason) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
        self.refresh_message();
    }

    fn on_file_placed(&self, _path: &Path, placement: &Placement) {
        if placement.is_duplicate() {
            self.duplicates.fetch_add(1, Ordering::Relaxed);
            self.refresh_message();
        }
        self.bar.inc(1);
    }

    fn on_finish(&self) {
        self.bar.finish_and_clear();
    }
}
