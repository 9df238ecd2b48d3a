//! Error types for permission checks
//!
//! This module defines all error types that can occur while loading an
//! allow-list into a checker or while resolving a single query.

use pubapi_meta::MetadataError;
use pubapi_rules::ConfigError;
use thiserror::Error;

/// Permission check error types.
///
/// None of these are retried internally. [`CheckError::UnresolvableType`]
/// is the only one expected during a normal scan and means "cannot judge",
/// not "denied".
#[derive(Debug, Error)]
pub enum CheckError {
    /// Allow-list directory missing or unreadable
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No declaring type could be found for the queried member
    #[error("Couldn't find JavaClass of itself or super class. ClassName=[{type_name}]")]
    UnresolvableType {
        /// Type named in the query.
        type_name: String,
        /// Metadata failure hit during the walk, if that is what stopped it.
        #[source]
        source: Option<MetadataError>,
    },

    /// Process-wide helpers were used before a provider was installed
    #[error("No type metadata provider installed")]
    ProviderNotInstalled,
}

/// Result type for permission checks.
pub type CheckResult<T> = Result<T, CheckError>;

impl CheckError {
    pub(crate) fn unresolvable(type_name: &str, source: Option<MetadataError>) -> Self {
        CheckError::UnresolvableType {
            type_name: type_name.to_string(),
            source,
        }
    }

    /// Check whether the query could not be judged (as opposed to a broken setup).
    pub fn is_cannot_judge(&self) -> bool {
        matches!(self, CheckError::UnresolvableType { .. })
    }

    /// Check if this error comes from allow-list loading.
    pub fn is_config_error(&self) -> bool {
        matches!(self, CheckError::Config(_))
    }

    /// Get error code for diagnostics output.
    pub fn error_code(&self) -> &'static str {
        match self {
            CheckError::Config(err) => err.error_code(),
            CheckError::UnresolvableType { .. } => "UNRESOLVABLE_TYPE",
            CheckError::ProviderNotInstalled => "PROVIDER_NOT_INSTALLED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::path::PathBuf;

    #[test]
    fn test_unresolvable_message() {
        let err = CheckError::unresolvable("a.b.NoExistingClass", None);
        assert_eq!(
            err.to_string(),
            "Couldn't find JavaClass of itself or super class. ClassName=[a.b.NoExistingClass]"
        );
        assert!(err.is_cannot_judge());
        assert!(err.source().is_none());
    }

    #[test]
    fn test_unresolvable_keeps_cause() {
        let err = CheckError::unresolvable(
            "a.b.Sub",
            Some(MetadataError::not_found("a.b.Missing")),
        );
        let cause = err.source().unwrap();
        assert_eq!(cause.to_string(), "Type not found: a.b.Missing");
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err = CheckError::from(ConfigError::DirectoryMissing {
            path: PathBuf::from("conf"),
        });
        assert!(err.is_config_error());
        assert_eq!(err.error_code(), "CONFIG_DIRECTORY_ERROR");
        assert_eq!(err.to_string(), "Config file directory doesn't exist.Path=[conf]");
    }
}
