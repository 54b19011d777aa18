//! Error types for pcbzip.
//!
//! Each area has its own error enum next to its code
//! ([`GerberError`], [`AssemblyError`], [`CatalogError`]). This module holds
//! the configuration error and the crate-level [`Error`] the CLI reports.

use std::path::PathBuf;

use thiserror::Error;

use crate::assembly::AssemblyError;
use crate::catalog::CatalogError;
use crate::gerber::GerberError;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be written.
    #[error("failed to write configuration file: {path}")]
    WriteError {
        /// Path to the configuration file or its directory.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Any failure a pcbzip command can report.
#[derive(Error, Debug)]
pub enum Error {
    /// Gerber archive or viewer failure.
    #[error(transparent)]
    Gerber(#[from] GerberError),

    /// BOM or placement failure.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    /// Parts catalog failure.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Configuration failure.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Returns `true` if the operator stopped the run rather than it failing.
    #[must_use]
    pub const fn is_interruption(&self) -> bool {
        match self {
            Self::Gerber(e) => e.is_user_abort(),
            Self::Assembly(e) => e.is_user_abort(),
            Self::Catalog(_) | Self::Config(_) => false,
        }
    }
}

/// Result type for top-level commands.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let error = ConfigError::NotFound {
            path: PathBuf::from("/path/to/config.json"),
        };
        let msg = error.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("config.json"));
    }

    #[test]
    fn validation_error_display() {
        let error = ConfigError::ValidationError {
            message: "invalid setting".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("invalid setting"));
    }

    #[test]
    fn user_abort_is_an_interruption() {
        let error = Error::from(AssemblyError::UserAborted);
        assert!(error.is_interruption());

        let error = Error::from(GerberError::UserAborted);
        assert!(error.is_interruption());

        let error = Error::from(GerberError::UnrecognizedFileSet);
        assert!(!error.is_interruption());
    }

    #[test]
    fn build_abort_is_reported_as_a_gerber_error() {
        let error = Error::from(GerberError::UserAborted);
        assert!(matches!(error, Error::Gerber(GerberError::UserAborted)));
        assert_eq!(error.to_string(), "Cancelled by user");
    }

    #[test]
    fn wrapped_errors_keep_their_message() {
        let inner = GerberError::invalid_input("project name is empty");
        let expected = inner.to_string();
        assert_eq!(Error::from(inner).to_string(), expected);
    }
}
