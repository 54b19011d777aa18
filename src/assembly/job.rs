//! Assembly file processing for one project.
//!
//! # File naming
//!
//! | File | Input (KiCad export) | Output |
//! |---|---|---|
//! | BOM | `<project>.csv` | `<project>_<version>_bom.csv` |
//! | Placement | `<project>-<side>-pos.csv` | `<project>_<side>_placement.csv` |
//!
//! Outputs go to `<project>_<version>_pcb_files/` inside the working directory.

use std::path::{Path, PathBuf};

use chrono::Local;

use crate::assembly::annotate::Annotator;
use crate::assembly::bom::BomDocument;
use crate::assembly::error::{AssemblyError, AssemblyResult};
use crate::assembly::placement::{BoardSide, ConvertedPlacement};
use crate::prompt::Prompt;

/// Paths and naming for one project and board version.
#[derive(Debug, Clone)]
pub struct AssemblyJob {
    project: String,
    version: String,
    work_dir: PathBuf,
}

/// What [`AssemblyJob::process`] produced.
#[derive(Debug, Clone, Default)]
pub struct AssemblyReport {
    /// Merged BOM path.
    pub bom: PathBuf,
    /// Number of BOM rows written.
    pub bom_lines: usize,
    /// Rows that already carry a part number.
    pub annotated_lines: usize,
    /// Backup of the previous annotated BOM, if one was replaced.
    pub backup: Option<PathBuf>,
    /// Placement files written, top first.
    pub placements: Vec<PathBuf>,
}

impl AssemblyJob {
    /// Creates a job for `project` at board `version` in `work_dir`.
    pub fn new(
        project: impl Into<String>,
        version: impl Into<String>,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project: project.into(),
            version: version.into(),
            work_dir: work_dir.into(),
        }
    }

    /// Output folder for the project files.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.work_dir
            .join(format!("{}_{}_pcb_files", self.project, self.version))
    }

    /// BOM exported by KiCad.
    #[must_use]
    pub fn bom_input(&self) -> PathBuf {
        self.work_dir.join(format!("{}.csv", self.project))
    }

    /// Annotated BOM.
    #[must_use]
    pub fn bom_output(&self) -> PathBuf {
        self.output_dir()
            .join(format!("{}_{}_bom.csv", self.project, self.version))
    }

    /// Placement file exported by KiCad for `side`.
    #[must_use]
    pub fn placement_input(&self, side: BoardSide) -> PathBuf {
        self.work_dir
            .join(format!("{}-{side}-pos.csv", self.project))
    }

    /// Placement file for the assembly service for `side`.
    #[must_use]
    pub fn placement_output(&self, side: BoardSide) -> PathBuf {
        self.output_dir()
            .join(format!("{}_{side}_placement.csv", self.project))
    }

    fn validate(&self) -> AssemblyResult<()> {
        for (what, value) in [("project name", &self.project), ("board version", &self.version)] {
            if value.trim().is_empty() {
                return Err(AssemblyError::InvalidInput {
                    message: format!("{what} must not be empty"),
                });
            }
        }

        let inputs = std::iter::once(self.bom_input())
            .chain(BoardSide::BOTH.map(|side| self.placement_input(side)));
        for path in inputs {
            if !path.is_file() {
                return Err(AssemblyError::FileNotFound { path });
            }
        }
        Ok(())
    }

    /// Converts the placement files and merges the BOM with any previous
    /// annotated copy.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::FileNotFound`] if an input is missing, a
    /// parse error if any input is malformed, or an I/O error.
    pub fn process(&self) -> AssemblyResult<AssemblyReport> {
        self.validate()?;

        // Parse every input before anything is written.
        let fresh = BomDocument::read(&self.bom_input())?;
        let bom = self.bom_output();
        let annotated = if bom.is_file() {
            Some(BomDocument::read(&bom)?)
        } else {
            None
        };
        let converted = BoardSide::BOTH
            .into_iter()
            .map(|side| Ok((side, ConvertedPlacement::read(&self.placement_input(side))?)))
            .collect::<AssemblyResult<Vec<_>>>()?;

        let out_dir = self.output_dir();
        std::fs::create_dir_all(&out_dir).map_err(|e| AssemblyError::file_write(&out_dir, e))?;

        let mut placements = Vec::with_capacity(BoardSide::BOTH.len());
        for (side, placement) in converted {
            let output = self.placement_output(side);
            placement.write(&output)?;
            tracing::info!(
                %side,
                rows = placement.rows(),
                file = %output.display(),
                "Wrote placement file"
            );
            placements.push(output);
        }

        let (merged, backup) = match annotated {
            Some(annotated) => (fresh.merged_with(&annotated), Some(backup_file(&bom)?)),
            None => (fresh, None),
        };
        merged.write(&bom)?;

        let annotated_lines = merged
            .lines
            .iter()
            .filter(|l| !l.part_number.is_empty())
            .count();
        tracing::info!(
            file = %bom.display(),
            lines = merged.len(),
            annotated = annotated_lines,
            "Wrote BOM"
        );

        Ok(AssemblyReport {
            bom,
            bom_lines: merged.len(),
            annotated_lines,
            backup,
            placements,
        })
    }

    /// Walks the output BOM interactively, saving after every answer.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::UserAborted`] if the operator aborts, or a
    /// read, parse or write error.
    pub fn annotate(&self, prompt: &mut dyn Prompt) -> AssemblyResult<()> {
        let path = self.bom_output();
        let mut document = BomDocument::read(&path)?;
        Annotator::new(&mut document).run(prompt, |doc| doc.write(&path))
    }
}

/// Copies `path` to `<path>.<YYYYmmdd-HHMMSS>.bak` and returns the backup path.
fn backup_file(path: &Path) -> AssemblyResult<PathBuf> {
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{stamp}.bak"));
    let backup = path.with_file_name(name);

    std::fs::copy(path, &backup).map_err(|e| AssemblyError::file_write(&backup, e))?;
    tracing::debug!(backup = %backup.display(), "Backed up annotated BOM");
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naming_conventions() {
        let job = AssemblyJob::new("amp", "2", "/work");
        assert_eq!(job.bom_input(), PathBuf::from("/work/amp.csv"));
        assert_eq!(
            job.bom_output(),
            PathBuf::from("/work/amp_2_pcb_files/amp_2_bom.csv")
        );
        assert_eq!(
            job.placement_input(BoardSide::Bottom),
            PathBuf::from("/work/amp-bottom-pos.csv")
        );
        assert_eq!(
            job.placement_output(BoardSide::Top),
            PathBuf::from("/work/amp_2_pcb_files/amp_top_placement.csv")
        );
    }

    #[test]
    fn missing_inputs_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let job = AssemblyJob::new("amp", "2", dir.path());
        match job.process() {
            Err(AssemblyError::FileNotFound { path }) => assert_eq!(path, job.bom_input()),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(!job.output_dir().exists());
    }

    #[test]
    fn backup_name_keeps_original() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("amp_2_bom.csv");
        std::fs::write(&file, "x").unwrap();

        let backup = backup_file(&file).unwrap();
        let name = backup.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("amp_2_bom.csv."));
        assert!(name.ends_with(".bak"));
        assert_eq!(std::fs::read_to_string(backup).unwrap(), "x");
    }
}
