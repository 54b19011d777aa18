//! Gerber preview through an external viewer.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::gerber::archive::extract_archive;
use crate::gerber::error::{GerberError, GerberResult};
use crate::gerber::stack::sort_for_stacking;

/// Something that can display an ordered stack of layer files.
pub trait LayerViewer {
    /// Shows `files`, first file at the bottom of the stack.
    ///
    /// # Errors
    ///
    /// Returns an error if the files cannot be shown.
    fn show(&self, files: &[PathBuf]) -> GerberResult<()>;
}

/// External gerber viewer programs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExternalViewer {
    /// `gerbv`, the gEDA gerber viewer.
    #[default]
    Gerbv,
    /// `gerbview`, shipped with KiCad.
    Gerbview,
}

impl ExternalViewer {
    /// Program name looked up on `PATH`.
    #[must_use]
    pub const fn program(self) -> &'static str {
        match self {
            Self::Gerbv => "gerbv",
            Self::Gerbview => "gerbview",
        }
    }

    /// Builds the command that opens `files` in this viewer.
    #[must_use]
    pub fn command(self, files: &[PathBuf]) -> Command {
        let mut cmd = Command::new(self.program());
        cmd.args(files);
        cmd
    }
}

impl LayerViewer for ExternalViewer {
    fn show(&self, files: &[PathBuf]) -> GerberResult<()> {
        let program = self.program();
        let cmdline: Vec<String> = std::iter::once(program.to_string())
            .chain(files.iter().map(|f| f.display().to_string()))
            .collect();
        tracing::info!(cmdline = %cmdline.join(" "), "Launching viewer");

        let status = self
            .command(files)
            .status()
            .map_err(|e| GerberError::ViewerLaunch {
                program: program.to_string(),
                source: e,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(GerberError::ViewerExit {
                program: program.to_string(),
                status: status.to_string(),
            })
        }
    }
}

impl fmt::Display for ExternalViewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

impl FromStr for ExternalViewer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gerbv" => Ok(Self::Gerbv),
            "gerbview" => Ok(Self::Gerbview),
            other => Err(format!("unknown viewer '{other}' (expected gerbv or gerbview)")),
        }
    }
}

/// Extracts `archive` into a private temporary directory and shows its layers
/// in stacking order.
///
/// The directory is removed when this returns, whether or not the viewer
/// succeeded.
///
/// # Errors
///
/// Returns an error if extraction fails, the file set is unrecognised, or the
/// viewer fails.
pub fn preview_archive(archive: &Path, viewer: &dyn LayerViewer) -> GerberResult<()> {
    let scratch = tempfile::Builder::new()
        .prefix("pcbzip-")
        .tempdir()
        .map_err(|e| GerberError::file_write(std::env::temp_dir(), e))?;

    let extracted = extract_archive(archive, scratch.path())?;
    tracing::debug!(
        dir = %scratch.path().display(),
        files = extracted.len(),
        "Extracted archive for preview"
    );

    let stacked = sort_for_stacking(&extracted)?;
    viewer.show(&stacked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_names() {
        assert_eq!(ExternalViewer::default().program(), "gerbv");
        assert_eq!("GerbView".parse::<ExternalViewer>().unwrap(), ExternalViewer::Gerbview);
        assert!("kicad".parse::<ExternalViewer>().is_err());
    }

    #[test]
    fn command_passes_files_in_order() {
        let files = vec![PathBuf::from("a-F_Cu.gtl"), PathBuf::from("a.drl")];
        let cmd = ExternalViewer::Gerbview.command(&files);
        assert_eq!(cmd.get_program(), "gerbview");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, vec!["a-F_Cu.gtl", "a.drl"]);
    }

    #[test]
    fn viewer_serialises_lowercase() {
        let json = serde_json::to_string(&ExternalViewer::Gerbview).unwrap();
        assert_eq!(json, "\"gerbview\"");
    }
}
