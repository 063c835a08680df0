//! Hard-link placement into the store.
//!
//! # Overview
//!
//! [`Placer::place`] makes sure the shard directory exists and then tries to
//! hard-link the source file at its [`StorePath`]. The filesystem resolves
//! every race: `mkdir` and `link` are atomic, so when two workers target the
//! same path exactly one link succeeds and the other sees `AlreadyExists`.
//! That `AlreadyExists` is the only way a duplicate is ever detected.
//!
//! Any other failure (cross-device link, permission denied, disk full) is
//! returned as a [`PlaceError`] and ends the run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::StorePath;
use crate::scanner::{FileCandidate, Fingerprint};

/// Errors that can occur while placing a file into the store.
#[derive(thiserror::Error, Debug)]
pub enum PlaceError {
    /// The shard directory could not be created.
    #[error("failed to create shard directory {path}")]
    CreateShard {
        /// Shard directory path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The hard link could not be created for a reason other than an
    /// existing target.
    #[error("failed to link {target} -> {source_path}")]
    Link {
        /// File being placed
        source_path: PathBuf,
        /// Store path the link was meant to occupy
        target: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Result of a successful placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// A new link was created; this content was not yet in the store.
    Linked(PathBuf),
    /// The store already held this (content, extension).
    Duplicate(PathBuf),
}

impl Placement {
    /// Whether the store already held this content.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }

    /// Absolute store path of the content.
    #[must_use]
    pub fn target(&self) -> &Path {
        match self {
            Self::Linked(path) | Self::Duplicate(path) => path,
        }
    }
}

/// Places files into a store rooted at a directory.
#[derive(Debug, Clone)]
pub struct Placer {
    root: PathBuf,
}

impl Placer {
    /// Create a placer for an existing store directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Link `candidate` into the store under its content address.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceError::CreateShard`] if the shard directory cannot be
    /// created and does not already exist, and [`PlaceError::Link`] if the
    /// link fails for any reason other than an existing target.
    pub fn place(
        &self,
        candidate: &FileCandidate,
        fingerprint: &Fingerprint,
    ) -> Result<Placement, PlaceError> {
        let store_path = StorePath::new(fingerprint, &candidate.extension);

        let shard_dir = store_path.shard_dir(&self.root);
        match fs::create_dir(&shard_dir) {
            Ok(()) => log::trace!("created shard {}", shard_dir.display()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(PlaceError::CreateShard {
                    path: shard_dir,
                    source: e,
                })
            }
        }

        let target = store_path.resolve(&self.root);
        log::debug!("{} -> {}", target.display(), candidate.path.display());

        match fs::hard_link(&candidate.path, &target) {
            Ok(()) => Ok(Placement::Linked(target)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                log::debug!("duplicate: {}", candidate.path.display());
                Ok(Placement::Duplicate(target))
            }
            Err(e) => Err(PlaceError::Link {
                source_path: candidate.path.clone(),
                target,
                source: e,
            }),
        }
    }
}
