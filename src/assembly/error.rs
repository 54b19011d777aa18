//! Error types for BOM and placement processing.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for assembly file operations.
pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// Errors that can occur while reconciling BOM and placement files.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// Project name or board version was empty.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of what's wrong.
        message: String,
    },

    /// An expected input file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was expected.
        path: PathBuf,
    },

    /// Failed to open or read a file.
    #[error("Failed to read file: {path}")]
    FileRead {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to write a file.
    #[error("Failed to write file: {path}")]
    FileWrite {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A placement export did not contain the expected header row.
    #[error(
        "Placement header '{expected}' not found{}",
        path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default()
    )]
    HeaderNotFound {
        /// File that was searched, when known.
        path: Option<PathBuf>,
        /// The header that was expected.
        expected: String,
    },

    /// A BOM row did not have three or four fields.
    #[error("Invalid BOM line: {line}")]
    InvalidBomLine {
        /// The offending line.
        line: String,
    },

    /// Reading an interactive answer failed.
    #[error("Failed to read answer")]
    Prompt {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The operator aborted an interactive session.
    #[error("Aborted by user")]
    UserAborted,

    /// Failed to serialise a BOM.
    #[error("Failed to format BOM: {message}")]
    Format {
        /// Description of what went wrong.
        message: String,
    },
}

impl AssemblyError {
    /// Creates a file read error.
    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a file write error.
    pub fn file_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid BOM line error.
    pub fn invalid_bom_line(line: impl Into<String>) -> Self {
        Self::InvalidBomLine { line: line.into() }
    }

    /// Returns `true` if the operator stopped the session.
    #[must_use]
    pub const fn is_user_abort(&self) -> bool {
        matches!(self, Self::UserAborted)
    }
}
