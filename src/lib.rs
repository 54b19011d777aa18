//! pcbzip: package KiCad fabrication outputs for PCB manufacturers
//!
//! This library collects gerber and drill files into vendor-ready zip archives,
//! previews archives layer by layer in an external gerber viewer, and prepares
//! the BOM and placement files needed for assembled boards.
//!
//! # Architecture
//!
//! Every pipeline shares one vendor registry ([`gerber::Vendor`]):
//!
//! - **Archive Builder**: scans a directory for a vendor's required files and zips them
//! - **Stack Sorter**: orders extracted files into top-to-bottom layer order for preview
//! - **BOM/Placement Reconciler**: merges a fresh BOM against a hand-annotated one and
//!   renames placement headers for the assembly service
//!
//! A local copy of the distributor's parts catalog can be searched to find the
//! part numbers used in BOM annotations.
//!
//! # Modules
//!
//! - [`gerber`] — Vendor profiles, archive building, stacking and preview
//! - [`assembly`] — BOM and placement reconciliation
//! - [`catalog`] — Parts catalog import and search
//! - [`config`] — Configuration loading and saving
//! - [`prompt`] — Interactive question helpers
//! - [`setup`] — KiCad export settings per vendor
//! - [`error`] — Configuration and top-level error types

pub mod assembly;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gerber;
pub mod prompt;
pub mod setup;

pub use error::{Error, Result};
