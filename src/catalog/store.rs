//! Local parts catalog storage.
//!
//! The distributor publishes its catalog as a large CSV. `refresh` validates a
//! downloaded copy and installs it; [`CsvCatalog`] loads the installed copy
//! into memory for lookups.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::catalog::error::{CatalogError, CatalogResult};
use crate::catalog::part::CatalogPart;
use crate::catalog::search::{rank, SearchQuery};
use crate::config::SearchConfig;

/// Read access to a parts catalog.
pub trait PartsCatalog {
    /// Number of parts.
    fn len(&self) -> usize;

    /// Returns `true` if the catalog holds no parts.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks up a part by LCSC number, ignoring case.
    fn get(&self, lcsc: &str) -> Option<&CatalogPart>;

    /// Returns parts matching `query` under the `config` filters, best first.
    fn search(&self, query: &SearchQuery, config: &SearchConfig) -> Vec<&CatalogPart>;
}

/// Catalog held in memory, loaded from CSV.
#[derive(Debug, Clone, Default)]
pub struct CsvCatalog {
    parts: Vec<CatalogPart>,
    by_lcsc: HashMap<String, usize>,
}

impl CsvCatalog {
    /// Builds a catalog from parsed parts.
    #[must_use]
    pub fn from_parts(parts: Vec<CatalogPart>) -> Self {
        let by_lcsc = parts
            .iter()
            .enumerate()
            .map(|(i, p)| (p.lcsc.to_uppercase(), i))
            .collect();
        Self { parts, by_lcsc }
    }

    /// Parses catalog CSV from a reader. `origin` is used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] if any record is malformed.
    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> CatalogResult<Self> {
        let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let parts = csv
            .deserialize::<CatalogPart>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CatalogError::parse(origin, e))?;
        Ok(Self::from_parts(parts))
    }

    /// Loads the catalog at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if nothing has been imported yet, or
    /// a read or parse error.
    pub fn open(path: &Path) -> CatalogResult<Self> {
        if !path.is_file() {
            return Err(CatalogError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let file = std::fs::File::open(path).map_err(|e| CatalogError::io(path, e))?;
        let catalog = Self::from_reader(std::io::BufReader::new(file), path)?;
        tracing::debug!(parts = catalog.len(), file = %path.display(), "Loaded parts catalog");
        Ok(catalog)
    }

    /// All parts in file order.
    #[must_use]
    pub fn parts(&self) -> &[CatalogPart] {
        &self.parts
    }
}

impl PartsCatalog for CsvCatalog {
    fn len(&self) -> usize {
        self.parts.len()
    }

    fn get(&self, lcsc: &str) -> Option<&CatalogPart> {
        self.by_lcsc
            .get(&lcsc.trim().to_uppercase())
            .map(|&i| &self.parts[i])
    }

    fn search(&self, query: &SearchQuery, config: &SearchConfig) -> Vec<&CatalogPart> {
        rank(&self.parts, query, config)
    }
}

/// Default location of the installed catalog: `~/.pcbzip/parts.csv`.
#[must_use]
pub fn default_catalog_path() -> Option<PathBuf> {
    crate::config::default_config_dir().map(|p| p.join("parts.csv"))
}

/// Validates the catalog CSV at `source` and installs it at `dest`.
///
/// Returns the number of parts installed. `dest` is untouched if `source`
/// does not parse.
///
/// # Errors
///
/// Returns an error if `source` is missing or malformed, or the copy fails.
pub fn refresh(source: &Path, dest: &Path) -> CatalogResult<usize> {
    if !source.is_file() {
        return Err(CatalogError::io(
            source,
            std::io::Error::from(std::io::ErrorKind::NotFound),
        ));
    }
    let count = CsvCatalog::open(source)?.len();

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CatalogError::io(parent, e))?;
    }
    std::fs::copy(source, dest).map_err(|e| CatalogError::io(dest, e))?;
    tracing::info!(parts = count, file = %dest.display(), "Installed parts catalog");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
LCSC Part,First Category,Second Category,MFR.Part,Package,Solder Joint,Manufacturer,Library Type,Description,Datasheet,Price,Stock
C25744,Resistors,Chip Resistor - Surface Mount,0402WGF1002TCE,0402,2,UNI-ROYAL,Basic,10kΩ ±1% 62.5mW,https://example.com/ds.pdf,0.001,1000
C1525,Capacitors,MLCC,CL05B104KO5NNNC,0402,2,Samsung,Basic,100nF 16V X7R,,0.002,
C2040,Embedded Processors,Microcontrollers,RP2040,LQFN-56,57,Raspberry Pi,Extended,RP2040 MCU,,0.8,300
";

    fn sample() -> CsvCatalog {
        CsvCatalog::from_reader(SAMPLE.as_bytes(), Path::new("sample.csv")).unwrap()
    }

    #[test]
    fn loads_and_indexes() {
        let catalog = sample();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("c1525").unwrap().mfr_part, "CL05B104KO5NNNC");
        assert_eq!(catalog.get("C1525").unwrap().stock, None);
        assert!(catalog.get("C9").is_none());
    }

    #[test]
    fn search_through_trait() {
        let catalog = sample();
        let query = SearchQuery::parse("0402").unwrap();
        let hits = catalog.search(&query, &SearchConfig::default());
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].lcsc, "C25744");
    }

    #[test]
    fn malformed_catalog_is_rejected() {
        let bad = "Description\nno lcsc column\n";
        let result = CsvCatalog::from_reader(bad.as_bytes(), Path::new("bad.csv"));
        assert!(matches!(result, Err(CatalogError::Parse { .. })));
    }

    #[test]
    fn refresh_installs_copy() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("download.csv");
        let dest = dir.path().join("store").join("parts.csv");
        std::fs::write(&source, SAMPLE).unwrap();

        assert_eq!(refresh(&source, &dest).unwrap(), 3);
        assert_eq!(CsvCatalog::open(&dest).unwrap().len(), 3);
    }

    #[test]
    fn refresh_keeps_existing_on_bad_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("download.csv");
        let dest = dir.path().join("parts.csv");
        std::fs::write(&source, "Description\nbroken\n").unwrap();
        std::fs::write(&dest, SAMPLE).unwrap();

        assert!(refresh(&source, &dest).is_err());
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), SAMPLE);
    }
}
