//! Gerber and drill file packaging.
//!
//! - [`vendor`] — manufacturer file-set registry
//! - [`fileset`] — directory scanning and completeness checks
//! - [`builder`] — writes the upload archive
//! - [`stack`] — orders extracted layers for preview
//! - [`viewer`] — runs an external gerber viewer
//!
//! # File naming
//!
//! Files are recognised only by filename suffix. KiCad writes
//! `<board>-<layer>.<ext>`, so `tracker-F_Cu.gtl` satisfies `F_Cu.gtl`. The
//! contents are never inspected.

pub mod archive;
pub mod builder;
pub mod error;
pub mod fileset;
pub mod stack;
pub mod vendor;
pub mod viewer;

pub use builder::{archive_file_name, ArchiveBuilder};
pub use error::{GerberError, GerberResult};
pub use fileset::{CandidateFileSet, GERBER_EXTENSIONS};
pub use stack::{infer_vendor, sort_for_stacking};
pub use vendor::{required_files_for, Vendor};
pub use viewer::{preview_archive, ExternalViewer, LayerViewer};
