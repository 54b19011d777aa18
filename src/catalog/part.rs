//! Catalog part records.

use serde::Deserialize;

/// One part from the distributor catalog export.
///
/// Column names follow the JLCPCB/LCSC parts list CSV. Columns this tool does
/// not use are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogPart {
    /// LCSC part number, e.g. `C25744`.
    #[serde(rename = "LCSC Part")]
    pub lcsc: String,

    /// Top-level category.
    #[serde(rename = "First Category", default)]
    pub first_category: String,

    /// Sub-category.
    #[serde(rename = "Second Category", default)]
    pub second_category: String,

    /// Manufacturer part number.
    #[serde(rename = "MFR.Part", default)]
    pub mfr_part: String,

    /// Package name.
    #[serde(rename = "Package", default)]
    pub package: String,

    /// Manufacturer.
    #[serde(rename = "Manufacturer", default)]
    pub manufacturer: String,

    /// `Basic` or `Extended`.
    #[serde(rename = "Library Type", default)]
    pub library_type: String,

    /// Free-text description.
    #[serde(rename = "Description", default)]
    pub description: String,

    /// Datasheet URL.
    #[serde(rename = "Datasheet", default)]
    pub datasheet: String,

    /// Price breaks as exported.
    #[serde(rename = "Price", default)]
    pub price: String,

    /// Units in stock, when known.
    #[serde(rename = "Stock", default)]
    pub stock: Option<u64>,
}

impl CatalogPart {
    /// Returns `true` for basic library parts (no extended-part setup fee).
    #[must_use]
    pub fn is_basic(&self) -> bool {
        self.library_type.eq_ignore_ascii_case("basic")
    }

    /// Stock level, zero when unknown.
    #[must_use]
    pub fn stock(&self) -> u64 {
        self.stock.unwrap_or(0)
    }

    /// Text fields a search term is matched against.
    pub(crate) fn searchable_fields(&self) -> [&str; 6] {
        [
            &self.lcsc,
            &self.mfr_part,
            &self.package,
            &self.first_category,
            &self.second_category,
            &self.description,
        ]
    }

    /// One-line summary for listings.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{:<10} {:<8} {:>9} {:<24} {:<14} {}",
            self.lcsc,
            if self.is_basic() { "Basic" } else { "Extended" },
            self.stock(),
            self.mfr_part,
            self.package,
            self.description
        )
    }
}
