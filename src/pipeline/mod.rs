//! Walk → filter → hash → place pipeline.
//!
//! # Overview
//!
//! [`run`] drives one deduplication pass:
//!
//! ```text
//! driver thread                          worker pool (N threads)
//! ─────────────                          ───────────────────────
//! Walker ──► bounded(0) channel ──► hash-worker-0: Hasher → Placer
//!   (skipped,                     ├─► hash-worker-1: Hasher → Placer
//!    processed)                   └─► hash-worker-N: Hasher → Placer
//!                                              (duplicates)
//! ```
//!
//! The channel has no buffer, so a send blocks until a worker is free. At
//! most N + 1 files are in flight: N being hashed and one waiting in `send`.
//!
//! Any fatal error sets a shared abort flag. The walker stops at its next
//! entry, idle workers stop at their next receive, and the first error is
//! returned after every worker has been joined. Nothing is retried: the store
//! is safe to re-run against, since placement is idempotent.

pub mod counters;

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::{Receiver, Sender};

pub use counters::{Counters, Summary};

use crate::config::PipelineConfig;
use crate::progress::ProgressCallback;
use crate::scanner::{FileCandidate, HashError, Hasher, ScanError, Walker};
use crate::store::{PlaceError, Placer};

/// Errors that abort a run.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// Directory traversal failed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A file could not be read for hashing.
    #[error(transparent)]
    Hash(#[from] HashError),

    /// A file could not be placed into the store.
    #[error(transparent)]
    Place(#[from] PlaceError),

    /// A worker thread could not be started.
    #[error("failed to spawn worker thread")]
    Spawn(#[source] io::Error),

    /// A worker thread panicked.
    #[error("worker thread panicked")]
    WorkerPanicked,
}

/// Everything a worker needs, shared by reference across the pool.
struct WorkerContext<'a> {
    hasher: Hasher,
    placer: &'a Placer,
    counters: &'a Counters,
    abort: &'a AtomicBool,
    progress: Option<&'a dyn ProgressCallback>,
}

impl WorkerContext<'_> {
    /// Drain the channel until it is closed or the run is aborted.
    fn run(&self, queue: Receiver<FileCandidate>) -> Result<(), PipelineError> {
        for candidate in queue {
            if self.abort.load(Ordering::Acquire) {
                break;
            }
            if let Err(e) = self.process(&candidate) {
                self.abort.store(true, Ordering::Release);
                return Err(e);
            }
        }
        Ok(())
    }

    fn process(&self, candidate: &FileCandidate) -> Result<(), PipelineError> {
        let fingerprint = self.hasher.full_hash(&candidate.path)?;
        let placement = self.placer.place(candidate, &fingerprint)?;
        if placement.is_duplicate() {
            self.counters.record_duplicate();
        }
        if let Some(progress) = self.progress {
            progress.on_file_placed(&candidate.path, &placement);
        }
        Ok(())
    }
}

/// Run the pipeline to completion.
///
/// Returns the final totals, read after every worker has terminated.
///
/// # Errors
///
/// Returns the first fatal [`PipelineError`] encountered. Links created
/// before the failure stay in place.
///
/// # Example
///
/// ```no_run
/// use hashstore::config::{Config, PipelineConfig};
/// use hashstore::pipeline;
/// use std::path::PathBuf;
///
/// let config = PipelineConfig::new(
///     &Config::default(),
///     PathBuf::from("/store"),
///     vec![PathBuf::from("/photos")],
/// )
/// .unwrap();
/// let summary = pipeline::run(&config, None).unwrap();
/// println!("{summary}");
/// ```
pub fn run(
    config: &PipelineConfig,
    progress: Option<&dyn ProgressCallback>,
) -> Result<Summary, PipelineError> {
    let counters = Counters::new();
    let abort = AtomicBool::new(false);
    let placer = Placer::new(&config.output);

    log::info!(
        "Linking {} input(s) into {} with {} workers ({})",
        config.inputs.len(),
        config.output.display(),
        config.parallelism,
        config.algorithm
    );

    let context = WorkerContext {
        hasher: Hasher::new(config.algorithm),
        placer: &placer,
        counters: &counters,
        abort: &abort,
        progress,
    };

    let mut walker = Walker::new(config.inputs.clone(), &config.filter, &counters)
        .with_excluded(config.output.clone())
        .with_shutdown_flag(&abort);
    if let Some(progress) = progress {
        walker = walker.with_progress(progress);
    }

    let result = thread::scope(|scope| {
        // Created inside the scope so that every early return drops the
        // sender and lets already-spawned workers drain and exit.
        let (sender, receiver) = crossbeam_channel::bounded::<FileCandidate>(0);

        let mut workers = Vec::with_capacity(config.parallelism);
        for id in 0..config.parallelism {
            let queue = receiver.clone();
            let context = &context;
            let handle = thread::Builder::new()
                .name(format!("hash-worker-{id}"))
                .spawn_scoped(scope, move || context.run(queue))
                .map_err(PipelineError::Spawn)?;
            workers.push(handle);
        }
        drop(receiver);

        let walked = feed(&walker, &sender, &abort);
        drop(sender);

        let mut first_error = walked.err();
        for handle in workers {
            let outcome = handle
                .join()
                .unwrap_or_else(|_| Err(PipelineError::WorkerPanicked));
            if let Err(e) = outcome {
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    });

    if let Some(progress) = progress {
        progress.on_finish();
    }
    result?;

    let summary = counters.snapshot();
    log::info!(
        "Done: {} linked, {} duplicates, {} skipped",
        summary.linked(),
        summary.duplicates,
        summary.skipped
    );
    Ok(summary)
}

/// Hand every accepted file to the pool, stopping at the first walk error.
fn feed(
    walker: &Walker<'_>,
    sender: &Sender<FileCandidate>,
    abort: &AtomicBool,
) -> Result<(), PipelineError> {
    for candidate in walker.walk() {
        let candidate = match candidate {
            Ok(candidate) => candidate,
            Err(e) => {
                abort.store(true, Ordering::Release);
                return Err(e.into());
            }
        };
        // Only fails once every worker has exited after an error.
        if sender.send(candidate).is_err() {
            break;
        }
    }
    Ok(())
}
