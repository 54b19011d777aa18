//! Candidate file discovery.
//!
//! Scanning happens in one pass: the directory listing is filtered through the
//! global gerber-like extension allowlist, then each vendor suffix collects the
//! files that end with it.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::gerber::error::{GerberError, GerberResult};
use crate::gerber::vendor::Vendor;

/// Extensions of files produced by a gerber or drill export.
///
/// Independent of the chosen vendor: it separates manufacturing files from
/// anything else that happens to sit in the working directory.
pub const GERBER_EXTENSIONS: &[&str] = &[
    ".gbr", ".drl", ".gtp", ".gbp", ".gbl", ".gtl", ".gto", ".gbo", ".gbs", ".gts", ".gm1",
];

/// Returns the final path component as text, if any.
pub(crate) fn file_name_of(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

/// Returns `true` if the file name ends with a gerber-like extension.
#[must_use]
pub fn is_gerber_like(file_name: &str) -> bool {
    GERBER_EXTENSIONS.iter().any(|ext| file_name.ends_with(ext))
}

/// Lists the regular files directly inside `dir`, sorted by path.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list_regular_files(dir: &Path) -> GerberResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| GerberError::directory_read(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| GerberError::directory_read(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Files discovered for one vendor, keyed by required suffix.
#[derive(Debug, Clone)]
pub struct CandidateFileSet {
    vendor: Vendor,
    /// Every gerber-like file seen, in scan order.
    files: Vec<PathBuf>,
    /// Required suffix → files ending with it, in stacking order.
    matches: IndexMap<&'static str, Vec<PathBuf>>,
}

impl CandidateFileSet {
    /// Scans `paths` for `vendor`, ignoring anything that is not gerber-like.
    #[must_use]
    pub fn scan<P: AsRef<Path>>(vendor: Vendor, paths: &[P]) -> Self {
        let mut matches: IndexMap<&'static str, Vec<PathBuf>> = vendor
            .required_suffixes()
            .iter()
            .map(|s| (*s, Vec::new()))
            .collect();
        let mut files = Vec::new();

        for path in paths {
            let path = path.as_ref();
            let Some(name) = file_name_of(path) else {
                continue;
            };
            if !is_gerber_like(&name) {
                tracing::debug!(file = %name, "Skipping non-gerber file");
                continue;
            }
            for (suffix, found) in &mut matches {
                if name.ends_with(suffix) {
                    found.push(path.to_path_buf());
                }
            }
            files.push(path.to_path_buf());
        }

        Self {
            vendor,
            files,
            matches,
        }
    }

    /// The vendor this set was scanned for.
    #[must_use]
    pub const fn vendor(&self) -> Vendor {
        self.vendor
    }

    /// Every gerber-like file seen, including ones no suffix required.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Files that satisfied `suffix`.
    #[must_use]
    pub fn matching(&self, suffix: &str) -> &[PathBuf] {
        self.matches.get(suffix).map_or(&[][..], Vec::as_slice)
    }

    /// Required suffixes no file satisfied, in stacking order.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        self.matches
            .iter()
            .filter(|(_, found)| found.is_empty())
            .map(|(suffix, _)| *suffix)
            .collect()
    }

    /// Returns `true` when every required suffix has at least one file.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.matches.values().all(|found| !found.is_empty())
    }

    /// Fails with [`GerberError::MissingRequiredFiles`] if the set is incomplete.
    ///
    /// # Errors
    ///
    /// Returns an error listing the full required list and the missing suffixes.
    pub fn ensure_complete(&self) -> GerberResult<()> {
        let missing = self.missing();
        if missing.is_empty() {
            return Ok(());
        }
        Err(GerberError::MissingRequiredFiles {
            expected: self
                .vendor
                .required_suffixes()
                .iter()
                .map(ToString::to_string)
                .collect(),
            missing: missing.into_iter().map(ToString::to_string).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from("/work").join(n)).collect()
    }

    #[test]
    fn every_vendor_suffix_is_gerber_like() {
        for vendor in Vendor::ALL {
            for suffix in vendor.required_suffixes() {
                assert!(is_gerber_like(suffix), "{suffix}");
            }
        }
    }

    #[test]
    fn unrelated_files_are_not_candidates() {
        let set = CandidateFileSet::scan(
            Vendor::PcbWay,
            &paths(&["board-F.Cu.gbr", "board.kicad_pcb", "notes.txt"]),
        );
        assert_eq!(set.files().len(), 1);
    }

    #[test]
    fn suffix_satisfied_by_several_files() {
        let set = CandidateFileSet::scan(
            Vendor::JlcPcbV6,
            &paths(&["board-PTH.drl", "board-NPTH.drl", "board-F_Cu.gtl"]),
        );
        assert_eq!(set.matching(".drl").len(), 2);
        assert_eq!(set.matching("F_Cu.gtl").len(), 1);
        assert!(!set.missing().contains(&".drl"));
    }

    #[test]
    fn missing_suffixes_in_stacking_order() {
        let set = CandidateFileSet::scan(Vendor::JlcPcbV6, &paths(&["board-F_Cu.gtl"]));
        let missing = set.missing();
        assert_eq!(missing.first(), Some(&"B_Cu.gbl"));
        assert_eq!(missing.last(), Some(&".drl"));
        assert_eq!(missing.len(), Vendor::JlcPcbV6.required_suffixes().len() - 1);
        assert!(!set.is_complete());
    }

    #[test]
    fn ensure_complete_reports_expected_and_missing() {
        let mut names: Vec<String> = Vendor::PcbWay
            .required_suffixes()
            .iter()
            .map(|s| format!("board-{s}"))
            .collect();
        names.retain(|n| !n.ends_with("B.Mask.gbr"));
        let names: Vec<&str> = names.iter().map(String::as_str).collect();

        let set = CandidateFileSet::scan(Vendor::PcbWay, &paths(&names));
        match set.ensure_complete() {
            Err(GerberError::MissingRequiredFiles { expected, missing }) => {
                assert_eq!(expected.len(), Vendor::PcbWay.required_suffixes().len());
                assert_eq!(missing, vec!["B.Mask.gbr".to_string()]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
