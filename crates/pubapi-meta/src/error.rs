//! Error types for type metadata lookups
//!
//! This module defines all error types that can occur while describing a
//! type: missing classes, unreadable class files, malformed class data and
//! broken JSON fixtures.

use std::path::PathBuf;
use thiserror::Error;

use crate::classfile::ClassFormatError;

/// Type metadata error types.
///
/// Only [`MetadataError::NotFound`] is expected during normal scans: it is
/// raised whenever a referenced type is not on the available class path.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// No metadata is available for the requested type
    #[error("Type not found: {type_name}")]
    NotFound {
        /// Fully-qualified name that was requested.
        type_name: String,
    },

    /// A class file exists but could not be read
    #[error("Failed to read class file {}: {source}", path.display())]
    Io {
        /// Class file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A class file was read but its contents are not a valid class
    #[error("Malformed class file {}: {source}", path.display())]
    ClassFormat {
        /// Class file path.
        path: PathBuf,
        /// Decoding failure.
        #[source]
        source: ClassFormatError,
    },

    /// A JSON type fixture could not be decoded
    #[error("Invalid type fixture: {0}")]
    Fixture(#[from] serde_json::Error),
}

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

impl MetadataError {
    /// Create a not-found error for a type name.
    pub fn not_found(type_name: impl Into<String>) -> Self {
        MetadataError::NotFound {
            type_name: type_name.into(),
        }
    }

    /// Check whether the type simply does not exist (as opposed to being broken).
    pub fn is_not_found(&self) -> bool {
        matches!(self, MetadataError::NotFound { .. })
    }

    /// Get error code for diagnostics output.
    pub fn error_code(&self) -> &'static str {
        match self {
            MetadataError::NotFound { .. } => "TYPE_NOT_FOUND",
            MetadataError::Io { .. } => "CLASS_READ_ERROR",
            MetadataError::ClassFormat { .. } => "CLASS_FORMAT_ERROR",
            MetadataError::Fixture(_) => "FIXTURE_ERROR",
        }
    }
}
