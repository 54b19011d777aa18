//! Local lookup over the distributor parts catalog.
//!
//! The catalog is a CSV export installed with `pcbzip refresh`. Searches are
//! shaped by [`SearchConfig`](crate::config::SearchConfig), which the
//! interactive menu edits and saves to the configuration file.

pub mod error;
pub mod menu;
pub mod part;
pub mod search;
pub mod store;

pub use error::{CatalogError, CatalogResult};
pub use menu::{run_search_menu, show_results};
pub use part::CatalogPart;
pub use search::SearchQuery;
pub use store::{default_catalog_path, refresh, CsvCatalog, PartsCatalog};
