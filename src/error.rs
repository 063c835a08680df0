//! Structured error handling and exit codes.

use serde::Serialize;

use crate::config::ConfigError;

/// Exit codes for the hashstore application.
///
/// - 0: Success (summary printed)
/// - 1: Fatal error during the run (traversal, read or link failure)
/// - 2: Invalid configuration (nothing was touched)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: every accepted file was placed.
    Success = 0,
    /// Fatal error: the run was aborted partway.
    FatalError = 1,
    /// Configuration error: the run never started.
    ConfigError = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "HS000",
            Self::FatalError => "HS001",
            Self::ConfigError => "HS002",
        }
    }

    /// Pick the exit code for an error returned by [`crate::run_app`].
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        if err.downcast_ref::<ConfigError>().is_some() {
            Self::ConfigError
        } else {
            Self::FatalError
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "HS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
