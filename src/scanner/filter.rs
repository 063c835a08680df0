//! Name-based path filtering.
//!
//! # Overview
//!
//! [`PathFilter`] is a pure decision function over a directory entry's base
//! name. It never touches the filesystem and never fails; the walker performs
//! the side effects (counting and logging) for every rejection.
//!
//! Patterns are unanchored regular expressions applied with search semantics,
//! so `jpg` matches `.jpg` as well as `.jpgx`. Anchor them explicitly when an
//! exact match is wanted.
//!
//! # Example
//!
//! ```
//! use hashstore::scanner::{FilterDecision, PathFilter, SkipReason};
//!
//! let filter = PathFilter::default();
//! assert_eq!(filter.check("IMG_0001.JPG", false), FilterDecision::Accept);
//! assert_eq!(
//!     filter.check("Thumbnails", true),
//!     FilterDecision::Reject(SkipReason::SkipDir)
//! );
//! ```

use std::ffi::{OsStr, OsString};
use std::fmt;

use regex::Regex;

/// Default pattern matched against the lowercase extension (including the dot).
pub const DEFAULT_EXTENSION_PATTERN: &str = "(jpg|jpeg|tiff|png|avi|mpg|mp4|mov|3gp)";

/// Default pattern matched against a file's base name.
pub const DEFAULT_SKIP_FILE_PATTERN: &str = r"\.jpg_face(\d+)\.";

/// Default pattern matched against a directory's base name.
pub const DEFAULT_SKIP_DIR_PATTERN: &str = "^(Thumbnails|derivatives|Previews|face)$";

/// Why an entry was not processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Directory name matched the skip-dir pattern; the whole subtree is pruned.
    SkipDir,
    /// Lowercase extension did not match the allowed-extension pattern.
    Extension,
    /// File name matched the skip-file pattern.
    SkipFile,
    /// Symbolic links are never followed or linked.
    Symlink,
    /// FIFOs, sockets and device nodes.
    Special,
    /// The output store itself, when it lives inside an input tree.
    OutputStore,
}

impl SkipReason {
    /// Whether this reason prunes a whole directory subtree.
    #[must_use]
    pub fn prunes_subtree(self) -> bool {
        matches!(self, Self::SkipDir | Self::OutputStore)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::SkipDir => "directory matches skip-dir pattern",
            Self::Extension => "extension not allowed",
            Self::SkipFile => "file name matches skip-file pattern",
            Self::Symlink => "symbolic link",
            Self::Special => "not a regular file",
            Self::OutputStore => "output store directory",
        };
        f.write_str(text)
    }
}

/// Outcome of a filter check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// File should be hashed and placed.
    Accept,
    /// Directory should be descended into.
    Descend,
    /// Entry is rejected (for directories, along with its subtree).
    Reject(SkipReason),
}

/// Compiled path filter.
///
/// Built once from validated patterns and shared by reference with the
/// walker for the duration of a run.
#[derive(Debug, Clone)]
pub struct PathFilter {
    extension: Regex,
    skip_file: Regex,
    skip_dir: Regex,
}

impl PathFilter {
    /// Create a filter from already compiled patterns.
    ///
    /// # Arguments
    ///
    /// * `extension` - Matched against the lowercase extension, including the dot
    /// * `skip_file` - Matched against a file's base name
    /// * `skip_dir` - Matched against a directory's base name
    #[must_use]
    pub fn new(extension: Regex, skip_file: Regex, skip_dir: Regex) -> Self {
        Self {
            extension,
            skip_file,
            skip_dir,
        }
    }

    /// Decide what to do with an entry given its base name.
    #[must_use]
    pub fn check(&self, name: &str, is_dir: bool) -> FilterDecision {
        if is_dir {
            return if self.skip_dir.is_match(name) {
                FilterDecision::Reject(SkipReason::SkipDir)
            } else {
                FilterDecision::Descend
            };
        }

        if !self.extension.is_match(&lowercase_extension(name)) {
            return FilterDecision::Reject(SkipReason::Extension);
        }
        if self.skip_file.is_match(name) {
            return FilterDecision::Reject(SkipReason::SkipFile);
        }
        FilterDecision::Accept
    }
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::new(
            Regex::new(DEFAULT_EXTENSION_PATTERN).expect("default extension pattern is valid"),
            Regex::new(DEFAULT_SKIP_FILE_PATTERN).expect("default skip-file pattern is valid"),
            Regex::new(DEFAULT_SKIP_DIR_PATTERN).expect("default skip-dir pattern is valid"),
        )
    }
}

/// Lowercase extension of a base name, including the leading dot.
///
/// The extension runs from the last `.` to the end of the name. A name
/// without a dot has an empty extension; `.bashrc` is all extension.
///
/// ```
/// use hashstore::scanner::lowercase_extension;
///
/// assert_eq!(lowercase_extension("IMG_0001.JPG"), ".jpg");
/// assert_eq!(lowercase_extension("archive.tar.gz"), ".gz");
/// assert_eq!(lowercase_extension("README"), "");
/// ```
#[must_use]
pub fn lowercase_extension(name: &str) -> String {
    name.rfind('.')
        .map(|idx| name[idx..].to_lowercase())
        .unwrap_or_default()
}

/// Lowercase extension of a raw file name, as used in store paths.
///
/// Same split as [`lowercase_extension`], but bytes that are not valid UTF-8
/// are kept as they are instead of being replaced, so two extensions that
/// differ only in such bytes stay distinct. Valid runs are lowercased.
#[cfg(unix)]
#[must_use]
pub fn store_extension(name: &OsStr) -> OsString {
    use std::os::unix::ffi::{OsStrExt, OsStringExt};

    let bytes = name.as_bytes();
    let Some(idx) = bytes.iter().rposition(|&b| b == b'.') else {
        return OsString::new();
    };

    let mut ext = Vec::with_capacity(bytes.len() - idx);
    for chunk in bytes[idx..].utf8_chunks() {
        ext.extend_from_slice(chunk.valid().to_lowercase().as_bytes());
        ext.extend_from_slice(chunk.invalid());
    }
    OsString::from_vec(ext)
}

/// Lowercase extension of a raw file name, as used in store paths.
#[cfg(not(unix))]
#[must_use]
pub fn store_extension(name: &OsStr) -> OsString {
    lowercase_extension(&name.to_string_lossy()).into()
}
