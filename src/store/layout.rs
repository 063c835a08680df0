//! Content-addressed store layout.
//!
//! A fingerprint and a lowercase extension map to `<shard>/<remainder><ext>`:
//! the shard is the fingerprint's first byte as two hex digits, the remainder
//! is the other 31 bytes as 62 hex digits. The mapping is pure, so the same
//! (content, extension) pair lands on the same path in every run.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::scanner::{hash_to_hex, Fingerprint};

/// Location of one piece of content inside the store, relative to its root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorePath {
    shard: String,
    file_name: OsString,
}

impl StorePath {
    /// Derive the store location for a fingerprint and lowercase extension.
    ///
    /// ```
    /// use hashstore::store::StorePath;
    ///
    /// let mut fingerprint = [0u8; 32];
    /// fingerprint[0] = 0xab;
    /// let path = StorePath::new(&fingerprint, ".jpg");
    /// assert_eq!(path.shard(), "ab");
    /// assert_eq!(path.file_name(), format!("{}.jpg", "0".repeat(62)).as_str());
    /// ```
    ///
    /// The extension is appended as raw bytes.
    #[must_use]
    pub fn new(fingerprint: &Fingerprint, extension: impl AsRef<OsStr>) -> Self {
        let (head, rest) = fingerprint.split_at(1);
        let mut file_name = OsString::from(hash_to_hex(rest));
        file_name.push(extension);
        Self {
            shard: hash_to_hex(head),
            file_name,
        }
    }

    /// Shard directory name.
    #[must_use]
    pub fn shard(&self) -> &str {
        &self.shard
    }

    /// File name inside the shard.
    #[must_use]
    pub fn file_name(&self) -> &OsStr {
        &self.file_name
    }

    /// Absolute shard directory under `root`.
    #[must_use]
    pub fn shard_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.shard)
    }

    /// Absolute link path under `root`.
    #[must_use]
    pub fn resolve(&self, root: &Path) -> PathBuf {
        self.shard_dir(root).join(&self.file_name)
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.shard, self.file_name.to_string_lossy())
    }
}
