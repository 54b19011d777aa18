//! Error types for gerber packaging and preview.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for gerber operations.
pub type GerberResult<T> = Result<T, GerberError>;

/// Errors that can occur while building or previewing a manufacturing archive.
#[derive(Debug, Error)]
pub enum GerberError {
    /// The manufacturer menu answer did not name a known vendor.
    #[error("Invalid manufacturer selection '{selection}' (supported: 1, 2, 3 or 4)")]
    InvalidVendorSelection {
        /// The answer as entered.
        selection: String,
    },

    /// Project name or board version was empty.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of what's wrong.
        message: String,
    },

    /// The working directory does not hold every file the vendor requires.
    #[error("Not all required files are present ({} missing)", missing.join(", "))]
    MissingRequiredFiles {
        /// Every suffix the vendor requires, in stacking order.
        expected: Vec<String>,
        /// The suffixes no file satisfied.
        missing: Vec<String>,
    },

    /// No file matched the first layer of any known vendor profile.
    #[error("Unrecognised gerber file set: no file matches a known manufacturer layout")]
    UnrecognizedFileSet,

    /// A named input file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Failed to list a directory.
    #[error("Failed to list directory: {path}")]
    DirectoryRead {
        /// Path to the directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
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

    /// The zip archive could not be written or read.
    #[error("Archive error in {path}")]
    Archive {
        /// Path to the archive.
        path: PathBuf,
        /// Underlying zip error.
        #[source]
        source: zip::result::ZipError,
    },

    /// The external viewer could not be started.
    #[error("Failed to launch viewer '{program}'")]
    ViewerLaunch {
        /// Program name.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The external viewer exited unsuccessfully.
    #[error("Viewer '{program}' exited with {status}")]
    ViewerExit {
        /// Program name.
        program: String,
        /// Exit status description.
        status: String,
    },

    /// Reading an interactive answer failed.
    #[error("Failed to read answer")]
    Prompt {
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The operator left before the archive was built.
    #[error("Cancelled by user")]
    UserAborted,
}

impl GerberError {
    /// Creates an invalid vendor selection error.
    pub fn invalid_vendor_selection(selection: impl Into<String>) -> Self {
        Self::InvalidVendorSelection {
            selection: selection.into(),
        }
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a directory listing error.
    pub fn directory_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::DirectoryRead {
            path: path.into(),
            source,
        }
    }

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

    /// Creates a prompt failure error.
    pub const fn prompt(source: io::Error) -> Self {
        Self::Prompt { source }
    }

    /// Creates an archive error.
    pub fn archive(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Archive {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the operator stopped the run.
    #[must_use]
    pub const fn is_user_abort(&self) -> bool {
        matches!(self, Self::UserAborted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_display_lists_suffixes() {
        let err = GerberError::MissingRequiredFiles {
            expected: vec!["F_Cu.gtl".into(), "B_Cu.gbl".into(), ".drl".into()],
            missing: vec!["B_Cu.gbl".into(), ".drl".into()],
        };
        assert_eq!(
            err.to_string(),
            "Not all required files are present (B_Cu.gbl, .drl missing)"
        );
    }

    #[test]
    fn vendor_selection_display() {
        let err = GerberError::invalid_vendor_selection("7");
        assert!(err.to_string().contains("'7'"));
    }

    #[test]
    fn prompt_error_keeps_io_source() {
        use std::error::Error as _;

        let err = GerberError::prompt(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        assert_eq!(err.to_string(), "Failed to read answer");
        assert_eq!(err.source().unwrap().to_string(), "pipe closed");
        assert!(!err.is_user_abort());
        assert!(GerberError::UserAborted.is_user_abort());
    }
}
