//! Application configuration management.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. TOML config file (`--config`, or `config.toml` in the platform config dir)
//! 3. `HASHSTORE_*` environment variables (e.g. `HASHSTORE_PARALLELISM=4`)
//! 4. CLI flags (applied by [`Config::apply_cli`])
//!
//! The merged [`Config`] is then validated once into an immutable
//! [`PipelineConfig`]: patterns are compiled, directories checked and the
//! output path canonicalized. Nothing downstream re-reads settings.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::scanner::filter::{
    DEFAULT_EXTENSION_PATTERN, DEFAULT_SKIP_DIR_PATTERN, DEFAULT_SKIP_FILE_PATTERN,
};
use crate::scanner::{HashAlgorithm, PathFilter};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "HASHSTORE_";

/// Default worker pool size.
pub const DEFAULT_PARALLELISM: usize = 16;

/// Keys accepted in the config file.
const KNOWN_KEYS: &[&str] = &["parallelism", "extension", "skip_file", "skip_dir", "hash"];

/// Errors raised while loading or validating configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A filter pattern failed to compile.
    #[error("invalid --{option} pattern")]
    InvalidPattern {
        /// Option name as spelled on the command line
        option: &'static str,
        /// The regex compile error
        #[source]
        source: regex::Error,
    },

    /// Parallelism must be at least one.
    #[error("parallelism must be at least 1")]
    ZeroParallelism,

    /// No input directories were given.
    #[error("at least one input directory is required")]
    NoInputs,

    /// An input or output path is missing or not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    MissingFile(PathBuf),

    /// The config file or environment could not be parsed.
    #[error("invalid configuration")]
    Invalid(#[from] Box<figment::Error>),

    /// Reading a path failed.
    #[error("I/O error for {path}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Layered settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Worker pool size.
    pub parallelism: usize,
    /// Pattern matched against the lowercase extension, including the dot.
    pub extension: String,
    /// Pattern matched against a file's base name.
    pub skip_file: String,
    /// Pattern matched against a directory's base name.
    pub skip_dir: String,
    /// Fingerprint algorithm.
    pub hash: HashAlgorithm,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parallelism: DEFAULT_PARALLELISM,
            extension: DEFAULT_EXTENSION_PATTERN.to_string(),
            skip_file: DEFAULT_SKIP_FILE_PATTERN.to_string(),
            skip_dir: DEFAULT_SKIP_DIR_PATTERN.to_string(),
            hash: HashAlgorithm::default(),
        }
    }
}

impl Config {
    /// Load defaults, the config file and the environment.
    ///
    /// With `explicit == None` the platform default path is used and a
    /// missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicit file is missing or any layer
    /// fails to parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::MissingFile(path.to_path_buf()))
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|p| p.is_file()),
        };

        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = &path {
            log::debug!("Loading config from {}", path.display());
            warn_unknown_keys(path);
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        figment.extract().map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "hashstore").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Override settings with any flags given on the command line.
    #[must_use]
    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if let Some(parallelism) = cli.parallelism {
            self.parallelism = parallelism;
        }
        if let Some(extension) = &cli.extension {
            self.extension.clone_from(extension);
        }
        if let Some(skip_file) = &cli.skip_file {
            self.skip_file.clone_from(skip_file);
        }
        if let Some(skip_dir) = &cli.skip_dir {
            self.skip_dir.clone_from(skip_dir);
        }
        if let Some(hash) = cli.hash {
            self.hash = hash;
        }
        self
    }
}

/// Log a warning for every unrecognised key in a TOML config file.
fn warn_unknown_keys(path: &Path) {
    let Ok(content) = fs::read_to_string(path) else {
        return;
    };
    let Ok(table) = content.parse::<toml::Table>() else {
        // figment reports the parse error with better context
        return;
    };
    for key in unknown_keys(&table) {
        match suggest_key(&key) {
            Some(suggestion) => log::warn!(
                "Unknown config key '{}' in {}, did you mean '{}'?",
                key,
                path.display(),
                suggestion
            ),
            None => log::warn!("Unknown config key '{}' in {}", key, path.display()),
        }
    }
}

fn unknown_keys(table: &toml::Table) -> Vec<String> {
    table
        .keys()
        .filter(|k| !KNOWN_KEYS.contains(&k.as_str()))
        .cloned()
        .collect()
}

/// Closest known key, if any is reasonably similar.
fn suggest_key(unknown: &str) -> Option<&'static str> {
    KNOWN_KEYS
        .iter()
        .map(|known| (*known, strsim::jaro_winkler(unknown, known)))
        .filter(|(_, score)| *score > 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(known, _)| known)
}

/// Validated, immutable settings for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Canonical store root
    pub output: PathBuf,
    /// Canonical input roots, in the order given
    pub inputs: Vec<PathBuf>,
    /// Worker pool size, at least one
    pub parallelism: usize,
    /// Compiled path filter
    pub filter: PathFilter,
    /// Fingerprint algorithm
    pub algorithm: HashAlgorithm,
}

impl PipelineConfig {
    /// Validate settings and directories into a run configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an invalid pattern, zero parallelism, no
    /// inputs, or an input/output that is not an existing directory.
    pub fn new(
        settings: &Config,
        output: PathBuf,
        inputs: Vec<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if settings.parallelism == 0 {
            return Err(ConfigError::ZeroParallelism);
        }
        if inputs.is_empty() {
            return Err(ConfigError::NoInputs);
        }

        let filter = PathFilter::new(
            compile("extension", &settings.extension)?,
            compile("skip-file", &settings.skip_file)?,
            compile("skip-dir", &settings.skip_dir)?,
        );

        let output = canonical_dir(&output)?;
        let inputs = inputs
            .iter()
            .map(|p| canonical_dir(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            output,
            inputs,
            parallelism: settings.parallelism,
            filter,
            algorithm: settings.hash,
        })
    }
}

fn compile(option: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern { option, source })
}

fn canonical_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    if !path.is_dir() {
        return Err(ConfigError::NotADirectory(path.to_path_buf()));
    }
    fs::canonicalize(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
