//! Zip archive I/O.
//!
//! Entries are flat: every file is stored under its base name and extraction
//! drops any directory part an entry name carries.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::gerber::error::{GerberError, GerberResult};
use crate::gerber::fileset::file_name_of;

/// Writes `files` into a new archive at `archive_path`, truncating any existing file.
///
/// # Errors
///
/// Returns an error if a source file cannot be read or the archive cannot be written.
pub fn write_archive<P: AsRef<Path>>(archive_path: &Path, files: &[P]) -> GerberResult<()> {
    let file =
        File::create(archive_path).map_err(|e| GerberError::file_write(archive_path, e))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in files {
        let path = path.as_ref();
        let Some(name) = file_name_of(path) else {
            continue;
        };
        let bytes = std::fs::read(path).map_err(|e| GerberError::file_read(path, e))?;
        zip.start_file(name.as_str(), options)
            .map_err(|e| GerberError::archive(archive_path, e))?;
        zip.write_all(&bytes)
            .map_err(|e| GerberError::file_write(archive_path, e))?;
        tracing::debug!(entry = %name, bytes = bytes.len(), "Added archive entry");
    }

    zip.finish()
        .map_err(|e| GerberError::archive(archive_path, e))?;
    Ok(())
}

fn open_archive(archive_path: &Path) -> GerberResult<ZipArchive<File>> {
    if !archive_path.is_file() {
        return Err(GerberError::FileNotFound {
            path: archive_path.to_path_buf(),
        });
    }
    let file = File::open(archive_path).map_err(|e| GerberError::file_read(archive_path, e))?;
    ZipArchive::new(file).map_err(|e| GerberError::archive(archive_path, e))
}

/// Returns the entry names stored in an archive, in archive order.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened.
pub fn entry_names(archive_path: &Path) -> GerberResult<Vec<String>> {
    let archive = open_archive(archive_path)?;
    Ok(archive.file_names().map(ToString::to_string).collect())
}

/// Extracts every file entry into `dest`, returning the written paths in archive order.
///
/// When two entries flatten to the same name, the first one is kept.
///
/// # Errors
///
/// Returns [`GerberError::FileNotFound`] if the archive does not exist, or an
/// error if it cannot be read or an entry cannot be written.
pub fn extract_archive(archive_path: &Path, dest: &Path) -> GerberResult<Vec<PathBuf>> {
    let mut archive = open_archive(archive_path)?;
    let mut extracted = Vec::with_capacity(archive.len());
    let mut seen = HashSet::new();

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| GerberError::archive(archive_path, e))?;
        if entry.is_dir() {
            continue;
        }
        // Entries with absolute or parent-relative names have no enclosed name.
        let Some(name) = entry.enclosed_name().as_deref().and_then(file_name_of) else {
            tracing::warn!(entry = entry.name(), "Skipping unsafe archive entry");
            continue;
        };
        if !seen.insert(name.clone()) {
            tracing::warn!(entry = entry.name(), file = %name, "Skipping duplicate archive entry");
            continue;
        }

        let target = dest.join(&name);
        let mut out = File::create(&target).map_err(|e| GerberError::file_write(&target, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| GerberError::file_write(&target, e))?;
        extracted.push(target);
    }

    Ok(extracted)
}
