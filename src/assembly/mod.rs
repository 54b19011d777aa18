//! BOM and placement files for assembled boards.
//!
//! - [`bom`] — BOM rows, matching and merging with an annotated copy
//! - [`placement`] — placement header conversion
//! - [`annotate`] — interactive part-number editor
//! - [`job`] — per-project file naming and the batch pipeline

pub mod annotate;
pub mod bom;
pub mod error;
pub mod job;
pub mod placement;

pub use annotate::{Annotator, Direction, EditorCommand, EditorState};
pub use bom::{find_match, merge, BomDocument, BomLine, MatchKey};
pub use error::{AssemblyError, AssemblyResult};
pub use job::{AssemblyJob, AssemblyReport};
pub use placement::{rewrite_placement_header, BoardSide, ConvertedPlacement};
