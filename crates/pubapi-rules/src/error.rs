//! Error types for allow-list loading
//!
//! Directory and IO failures are fatal to a load. Malformed lines are not:
//! they surface as [`EntryError`] to the parser caller, which logs and skips
//! them.

use std::path::PathBuf;
use thiserror::Error;

/// Allow-list loading error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured path does not exist or is not a directory
    #[error("Config file directory doesn't exist.Path=[{}]", path.display())]
    DirectoryMissing {
        /// Configured directory path.
        path: PathBuf,
    },

    /// Reading the directory or one of its files failed
    #[error("Couldn't read config file. Path=[{}]", path.display())]
    Read {
        /// Configured directory path.
        path: PathBuf,
        /// File being read, if the failure happened on a file.
        file: Option<PathBuf>,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for allow-list loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Directory the failing load was pointed at.
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::DirectoryMissing { path } | ConfigError::Read { path, .. } => path,
        }
    }

    /// Get error code for diagnostics output.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::DirectoryMissing { .. } => "CONFIG_DIRECTORY_ERROR",
            ConfigError::Read { .. } => "CONFIG_READ_ERROR",
        }
    }
}

/// A single allow-list line that does not follow the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed allow-list entry '{line}': {reason}")]
pub struct EntryError {
    /// Offending line, trimmed.
    pub line: String,
    /// What is wrong with it.
    pub reason: &'static str,
}

impl EntryError {
    pub(crate) fn new(line: &str, reason: &'static str) -> Self {
        Self {
            line: line.to_string(),
            reason,
        }
    }
}
