//! Component placement (pick and place) files.
//!
//! KiCad writes one position file per board side. Assembly houses expect
//! different column titles, so only the header row is rewritten; data rows
//! are copied unchanged.

use std::fmt;
use std::path::Path;

use crate::assembly::error::{AssemblyError, AssemblyResult};

/// Header row written by the KiCad position export.
pub const SOURCE_HEADER: &str = "Ref,Val,Package,PosX,PosY,Rot,Side";

/// Header row expected by the assembly service.
pub const TARGET_HEADER: &str = "Designator,Val,Package,Mid X,Mid Y,Rotation,Layer";

/// Board side of a placement file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardSide {
    /// Component side.
    Top,
    /// Solder side.
    Bottom,
}

impl BoardSide {
    /// Both sides, top first.
    pub const BOTH: [Self; 2] = [Self::Top, Self::Bottom];

    /// Lower-case name used in file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

impl fmt::Display for BoardSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Replaces the first source header line with the target header.
///
/// # Errors
///
/// Returns [`AssemblyError::HeaderNotFound`] when no line is exactly
/// [`SOURCE_HEADER`]; the export came from an unexpected tool version.
pub fn rewrite_placement_header<S: AsRef<str>>(lines: &[S]) -> AssemblyResult<Vec<String>> {
    let position = lines
        .iter()
        .position(|l| l.as_ref() == SOURCE_HEADER)
        .ok_or_else(|| AssemblyError::HeaderNotFound {
            path: None,
            expected: SOURCE_HEADER.to_string(),
        })?;

    Ok(
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                if i == position {
                    TARGET_HEADER.to_string()
                } else {
                    line.as_ref().to_string()
                }
            })
            .collect(),
    )
}

/// A position export with its header renamed, held in memory until written.
///
/// Line endings are kept as exported, so data rows are copied byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedPlacement {
    text: String,
    rows: usize,
}

impl ConvertedPlacement {
    /// Renames the header in exported placement text.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::HeaderNotFound`] (without a path) if the text
    /// lacks the KiCad header.
    pub fn from_text(text: &str) -> AssemblyResult<Self> {
        let lines: Vec<&str> = text.split_inclusive('\n').collect();
        let bodies: Vec<&str> = lines
            .iter()
            .map(|l| l.trim_end_matches(['\r', '\n']))
            .collect();
        let rewritten = rewrite_placement_header(&bodies)?;

        let mut out = String::with_capacity(text.len() + TARGET_HEADER.len());
        for ((line, body), new_body) in lines.iter().zip(&bodies).zip(&rewritten) {
            out.push_str(new_body);
            out.push_str(&line[body.len()..]);
        }

        Ok(Self {
            text: out,
            // Header row excluded.
            rows: rewritten.len().saturating_sub(1),
        })
    }

    /// Reads and converts the placement file at `input`.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::FileNotFound`] if `input` is absent,
    /// [`AssemblyError::HeaderNotFound`] naming `input` if it lacks the KiCad
    /// header, or a read error.
    pub fn read(input: &Path) -> AssemblyResult<Self> {
        if !input.is_file() {
            return Err(AssemblyError::FileNotFound {
                path: input.to_path_buf(),
            });
        }
        let text =
            std::fs::read_to_string(input).map_err(|e| AssemblyError::file_read(input, e))?;

        Self::from_text(&text).map_err(|e| match e {
            AssemblyError::HeaderNotFound { expected, .. } => AssemblyError::HeaderNotFound {
                path: Some(input.to_path_buf()),
                expected,
            },
            other => other,
        })
    }

    /// Number of lines after the header.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Converted file contents.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Writes the converted file to `output`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write(&self, output: &Path) -> AssemblyResult<()> {
        std::fs::write(output, &self.text).map_err(|e| AssemblyError::file_write(output, e))
    }
}
