//! Error types for the parts catalog.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::error::ConfigError;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while loading or searching the parts catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No local catalog has been imported yet.
    #[error("Parts catalog not found: {path} (run 'pcbzip refresh <CSV>' first)")]
    NotFound {
        /// Where the catalog was expected.
        path: PathBuf,
    },

    /// Failed to read or copy a catalog file.
    #[error("Failed to access catalog file: {path}")]
    Io {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The catalog CSV is malformed.
    #[error("Failed to parse catalog: {path}")]
    Parse {
        /// Path to the file.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// A search term could not be compiled.
    #[error("Invalid search pattern '{pattern}'")]
    Pattern {
        /// The term as entered.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// Search settings could not be saved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Interactive input failed.
    #[error("Failed to read answer")]
    Prompt {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl CatalogError {
    /// Creates an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error.
    pub fn parse(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
