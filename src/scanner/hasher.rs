//! Streaming content fingerprinting.
//!
//! # Overview
//!
//! [`Hasher`] reads a file sequentially through a fixed-size buffer and
//! produces a 256-bit [`Fingerprint`]. The digest is a function of the bytes
//! alone; path, name and extension never enter it.
//!
//! Two algorithms are available. SHA-256 is the default and is what existing
//! stores are laid out with; BLAKE3 is faster on large media. Mixing the two
//! against the same store defeats deduplication, since the same content gets
//! two different addresses.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::HashError;

/// 256-bit content fingerprint.
pub type Fingerprint = [u8; 32];

/// Read buffer size used while streaming file content.
pub const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Fingerprint algorithm.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256
    #[default]
    Sha256,
    /// BLAKE3
    Blake3,
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithm::Sha256 => write!(f, "sha256"),
            HashAlgorithm::Blake3 => write!(f, "blake3"),
        }
    }
}

/// Incremental digest state for either algorithm.
enum State {
    Sha256(Sha256),
    Blake3(Box<blake3::Hasher>),
}

impl State {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha256(h) => h.update(data),
            Self::Blake3(h) => {
                h.update(data);
            }
        }
    }

    fn finalize(self) -> Fingerprint {
        match self {
            Self::Sha256(h) => h.finalize().into(),
            Self::Blake3(h) => *h.finalize().as_bytes(),
        }
    }
}

/// File hasher.
///
/// Stateless apart from its configuration, so one instance can be shared by
/// reference across all worker threads.
#[derive(Debug, Clone, Copy)]
pub struct Hasher {
    algorithm: HashAlgorithm,
    buffer_size: usize,
}

impl Hasher {
    /// Create a hasher for the given algorithm.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            buffer_size: READ_BUFFER_SIZE,
        }
    }

    /// Override the read buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Fingerprint the entire content of a file.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or a read fails
    /// partway through.
    pub fn full_hash(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.hash_reader(file)
            .map_err(|e| HashError::from_io(path, e))
    }

    /// Fingerprint everything a reader yields until EOF.
    ///
    /// # Errors
    ///
    /// Propagates the first read error other than `Interrupted`.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<Fingerprint> {
        let mut state = State::new(self.algorithm);
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            state.update(&buffer[..n]);
        }

        Ok(state.finalize())
    }

    /// Fingerprint an in-memory byte slice.
    #[must_use]
    pub fn hash_bytes(&self, data: &[u8]) -> Fingerprint {
        let mut state = State::new(self.algorithm);
        state.update(data);
        state.finalize()
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(HashAlgorithm::default())
    }
}

/// Render a fingerprint (or any byte slice) as lowercase hex.
#[must_use]
pub fn hash_to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
            let _ = write!(out, "{b:02x}");
            out
        })
}
