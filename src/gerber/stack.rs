//! Layer stacking order for previews.
//!
//! Gerber viewers draw layers in argument order, later ones on top. Sorting an
//! extracted file list by the vendor's suffix table gives the same composite
//! every time, whatever order the archive stored the entries in.

use std::path::{Path, PathBuf};

use crate::gerber::error::{GerberError, GerberResult};
use crate::gerber::fileset::file_name_of;
use crate::gerber::vendor::Vendor;

fn ends_with(path: &Path, suffix: &str) -> bool {
    file_name_of(path).is_some_and(|name| name.ends_with(suffix))
}

/// Infers which vendor produced a file list.
///
/// The first path that ends with some profile's first suffix decides, with
/// profiles tried in [`Vendor::DETECTION_ORDER`].
///
/// # Errors
///
/// Returns [`GerberError::UnrecognizedFileSet`] if no path matches.
pub fn infer_vendor<P: AsRef<Path>>(paths: &[P]) -> GerberResult<Vendor> {
    paths
        .iter()
        .find_map(|path| {
            Vendor::DETECTION_ORDER
                .into_iter()
                .find(|vendor| ends_with(path.as_ref(), vendor.first_suffix()))
        })
        .ok_or(GerberError::UnrecognizedFileSet)
}

/// Orders `paths` top to bottom for the inferred vendor.
///
/// Paths that match no suffix of that vendor are dropped. Paths sharing a
/// suffix keep their input order.
///
/// # Errors
///
/// Returns [`GerberError::UnrecognizedFileSet`] if the vendor cannot be inferred.
pub fn sort_for_stacking<P: AsRef<Path>>(paths: &[P]) -> GerberResult<Vec<PathBuf>> {
    let paths: Vec<&Path> = paths.iter().map(AsRef::as_ref).collect();
    let vendor = infer_vendor(&paths)?;
    tracing::debug!(%vendor, "Inferred file set");

    let sorted: Vec<PathBuf> = vendor
        .required_suffixes()
        .iter()
        .flat_map(|suffix| {
            paths
                .iter()
                .filter(move |path| ends_with(path, suffix))
                .map(|path| path.to_path_buf())
        })
        .collect();

    if sorted.len() < paths.len() {
        tracing::debug!(
            dropped = paths.len() - sorted.len(),
            "Omitting files outside the layer stack"
        );
    }
    Ok(sorted)
}
