//! Manufacturing archive builder.

use std::path::{Path, PathBuf};

use crate::gerber::archive::write_archive;
use crate::gerber::error::{GerberError, GerberResult};
use crate::gerber::fileset::{list_regular_files, CandidateFileSet};
use crate::gerber::vendor::Vendor;

/// Returns the archive file name for a project, board version and vendor.
///
/// ```
/// use pcbzip::gerber::{archive_file_name, Vendor};
///
/// assert_eq!(archive_file_name("tracker", "2", Vendor::JlcPcbV6), "tracker_v2_jlcpcb.zip");
/// ```
#[must_use]
pub fn archive_file_name(project: &str, version: &str, vendor: Vendor) -> String {
    format!("{project}_v{version}_{}.zip", vendor.archive_id())
}

/// Packages the gerber and drill files in a working directory for one vendor.
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    vendor: Vendor,
    output_dir: Option<PathBuf>,
}

impl ArchiveBuilder {
    /// Creates a builder for `vendor` that writes the archive into the working directory.
    #[must_use]
    pub const fn new(vendor: Vendor) -> Self {
        Self {
            vendor,
            output_dir: None,
        }
    }

    /// Writes the archive into `dir` instead of the working directory.
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Scans `work_dir` without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    pub fn scan(&self, work_dir: &Path) -> GerberResult<CandidateFileSet> {
        let files = list_regular_files(work_dir)?;
        let set = CandidateFileSet::scan(self.vendor, &files);
        tracing::debug!(
            vendor = %self.vendor,
            listed = files.len(),
            candidates = set.files().len(),
            "Scanned working directory"
        );
        Ok(set)
    }

    /// Builds `<project>_v<version>_<vendor>.zip` from the files in `work_dir`.
    ///
    /// Every gerber-like file is archived, not only the required ones. Nothing
    /// is written unless each required suffix is satisfied.
    ///
    /// # Errors
    ///
    /// Returns [`GerberError::InvalidInput`] for an empty project or version,
    /// [`GerberError::MissingRequiredFiles`] when the file set is incomplete,
    /// or an I/O or archive error.
    pub fn build(&self, work_dir: &Path, project: &str, version: &str) -> GerberResult<PathBuf> {
        let project = project.trim();
        let version = version.trim();
        if project.is_empty() {
            return Err(GerberError::invalid_input("project name must not be empty"));
        }
        if version.is_empty() {
            return Err(GerberError::invalid_input("board version must not be empty"));
        }

        let set = self.scan(work_dir)?;
        set.ensure_complete()?;

        let out_dir = self.output_dir.as_deref().unwrap_or(work_dir);
        let archive_path = out_dir.join(archive_file_name(project, version, self.vendor));
        write_archive(&archive_path, set.files())?;

        tracing::info!(
            archive = %archive_path.display(),
            entries = set.files().len(),
            "Created archive"
        );
        Ok(archive_path)
    }
}
