//! Bill of materials rows and reconciliation.
//!
//! A BOM row has four quoted fields: comment (value), designator, footprint
//! and the vendor part number. A freshly exported BOM usually has no part
//! numbers; the annotated copy from a previous run does. Two rows describe the
//! same part when comment, designator and footprint match ignoring case.
//!
//! ```text
//! "Comment","Designator","Footprint","LCSC Part #"
//! "10k","R1,R2","R_0402_1005Metric","C25744"
//! ```

use std::path::Path;

use indexmap::IndexMap;

use crate::assembly::error::{AssemblyError, AssemblyResult};

/// Column title given to the part number when a BOM header lacks one.
pub const PART_NUMBER_HEADER: &str = "LCSC Part #";

/// One BOM row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BomLine {
    /// Component value or comment.
    pub comment: String,
    /// Reference designators, possibly several separated by commas.
    pub designator: String,
    /// Footprint name.
    pub footprint: String,
    /// Distributor part number, empty until annotated.
    pub part_number: String,
}

/// Case-insensitive identity of a BOM row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    comment: String,
    designator: String,
    footprint: String,
}

impl std::fmt::Display for MatchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.comment, self.designator, self.footprint)
    }
}

impl BomLine {
    /// Creates a row.
    pub fn new(
        comment: impl Into<String>,
        designator: impl Into<String>,
        footprint: impl Into<String>,
        part_number: impl Into<String>,
    ) -> Self {
        Self {
            comment: comment.into(),
            designator: designator.into(),
            footprint: footprint.into(),
            part_number: part_number.into(),
        }
    }

    /// Parses one CSV line. Quoted fields may contain commas.
    ///
    /// Three fields are accepted (no part number yet) as well as four.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::InvalidBomLine`] for any other field count or
    /// malformed quoting.
    pub fn parse(line: &str) -> AssemblyResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes());

        let record = match reader.records().next() {
            Some(Ok(record)) => record,
            Some(Err(_)) | None => return Err(AssemblyError::invalid_bom_line(line)),
        };

        match record.len() {
            3 | 4 => Ok(Self::new(
                &record[0],
                &record[1],
                &record[2],
                record.get(3).unwrap_or_default(),
            )),
            _ => Err(AssemblyError::invalid_bom_line(line)),
        }
    }

    /// Returns the case-insensitive match key.
    #[must_use]
    pub fn key(&self) -> MatchKey {
        MatchKey {
            comment: self.comment.to_lowercase(),
            designator: self.designator.to_lowercase(),
            footprint: self.footprint.to_lowercase(),
        }
    }

    /// Returns `true` if both rows describe the same part.
    #[must_use]
    pub fn is_same_part(&self, other: &Self) -> bool {
        self.key() == other.key()
    }

    fn fields(&self) -> [&str; 4] {
        [
            &self.comment,
            &self.designator,
            &self.footprint,
            &self.part_number,
        ]
    }
}

/// Finds the annotated row for `candidate`. The last matching row wins.
#[must_use]
pub fn find_match<'a>(candidate: &BomLine, existing: &'a [BomLine]) -> Option<&'a BomLine> {
    let key = candidate.key();
    existing.iter().rev().find(|line| line.key() == key)
}

/// Returns keys that occur on more than one row, in first-seen order.
#[must_use]
pub fn duplicate_keys(lines: &[BomLine]) -> Vec<MatchKey> {
    let mut counts: IndexMap<MatchKey, usize> = IndexMap::new();
    for line in lines {
        *counts.entry(line.key()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(key, _)| key)
        .collect()
}

/// Merges a fresh export with a previously annotated BOM.
///
/// Output follows the fresh row order. Each fresh row is replaced by its
/// annotated counterpart when one exists.
#[must_use]
pub fn merge(fresh: &[BomLine], annotated: &[BomLine]) -> Vec<BomLine> {
    for key in duplicate_keys(annotated) {
        tracing::warn!(part = %key, "Annotated BOM lists this part more than once; using the last row");
    }

    fresh
        .iter()
        .map(|line| {
            find_match(line, annotated).map_or_else(
                || line.clone(),
                |found| {
                    tracing::debug!(designator = %line.designator, part = %found.part_number, "Reusing annotation");
                    found.clone()
                },
            )
        })
        .collect()
}

/// A BOM file: header row plus part rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BomDocument {
    /// Column titles.
    pub header: BomLine,
    /// Part rows in file order.
    pub lines: Vec<BomLine>,
}

impl BomDocument {
    /// Parses BOM text. Blank lines are ignored; the first remaining line is the header.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::InvalidBomLine`] for an empty document or any
    /// malformed row. One bad row rejects the whole file.
    pub fn parse(text: &str) -> AssemblyResult<Self> {
        let mut rows = text.lines().filter(|l| !l.trim().is_empty());

        let mut header = BomLine::parse(rows.next().unwrap_or_default())?;
        if header.part_number.is_empty() {
            header.part_number = PART_NUMBER_HEADER.to_string();
        }

        let lines = rows.map(BomLine::parse).collect::<AssemblyResult<Vec<_>>>()?;
        Ok(Self { header, lines })
    }

    /// Reads and parses a BOM file.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::FileNotFound`] if the file is absent, or a read
    /// or parse error.
    pub fn read(path: &Path) -> AssemblyResult<Self> {
        if !path.is_file() {
            return Err(AssemblyError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|e| AssemblyError::file_read(path, e))?;
        Self::parse(&text)
    }

    /// Number of part rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if there are no part rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns this document with part numbers carried over from `annotated`.
    #[must_use]
    pub fn merged_with(&self, annotated: &Self) -> Self {
        Self {
            header: self.header.clone(),
            lines: merge(&self.lines, &annotated.lines),
        }
    }

    /// Formats the document with every field quoted.
    ///
    /// # Errors
    ///
    /// Returns an error if the CSV writer fails.
    pub fn to_csv_string(&self) -> AssemblyResult<String> {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        for line in std::iter::once(&self.header).chain(&self.lines) {
            writer
                .write_record(line.fields())
                .map_err(|e| AssemblyError::Format {
                    message: e.to_string(),
                })?;
        }

        let bytes = writer.into_inner().map_err(|e| AssemblyError::Format {
            message: e.to_string(),
        })?;
        String::from_utf8(bytes).map_err(|e| AssemblyError::Format {
            message: e.to_string(),
        })
    }

    /// Writes the document to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if formatting or writing fails.
    pub fn write(&self, path: &Path) -> AssemblyResult<()> {
        let text = self.to_csv_string()?;
        std::fs::write(path, text).map_err(|e| AssemblyError::file_write(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quoted_fields_with_commas() {
        let line = BomLine::parse(r#""100nF","C1,C2,C7","C_0402_1005Metric","C1525""#).unwrap();
        assert_eq!(line.comment, "100nF");
        assert_eq!(line.designator, "C1,C2,C7");
        assert_eq!(line.footprint, "C_0402_1005Metric");
        assert_eq!(line.part_number, "C1525");
    }

    #[test]
    fn parse_three_fields_leaves_part_number_empty() {
        let line = BomLine::parse(r#""10k","R1","0402""#).unwrap();
        assert_eq!(line.part_number, "");
    }

    #[test]
    fn wrong_field_count_is_rejected() {
        assert!(matches!(
            BomLine::parse(r#""10k","R1""#),
            Err(AssemblyError::InvalidBomLine { .. })
        ));
        assert!(BomLine::parse(r#""a","b","c","d","e""#).is_err());
        assert!(BomLine::parse("").is_err());
    }

    #[test]
    fn match_ignores_case() {
        let fresh = BomLine::new("10K", "r1", "0402", "");
        let existing = vec![BomLine::new("10k", "R1", "0402", "C25744")];
        assert_eq!(
            find_match(&fresh, &existing).map(|l| l.part_number.as_str()),
            Some("C25744")
        );
        assert!(find_match(&BomLine::new("10k", "R2", "0402", ""), &existing).is_none());
    }

    #[test]
    fn last_match_wins() {
        let existing = vec![
            BomLine::new("10k", "R1", "0402", "C1"),
            BomLine::new("10k", "R1", "0402", "C2"),
        ];
        let found = find_match(&BomLine::new("10k", "R1", "0402", ""), &existing).unwrap();
        assert_eq!(found.part_number, "C2");
        assert_eq!(duplicate_keys(&existing).len(), 1);
    }

    #[test]
    fn merge_keeps_annotations_and_fresh_order() {
        let fresh = vec![
            BomLine::parse(r#""1uF","C3","0603","""#).unwrap(),
            BomLine::parse(r#""10k","R1","0402","""#).unwrap(),
        ];
        let annotated = vec![BomLine::parse(r#""10k","R1","0402","C12345""#).unwrap()];

        let merged = merge(&fresh, &annotated);
        assert_eq!(merged[0].comment, "1uF");
        assert_eq!(merged[0].part_number, "");
        assert_eq!(merged[1].part_number, "C12345");
    }

    #[test]
    fn document_header_gains_part_number_column() {
        let doc = BomDocument::parse(
            "\"Comment\",\"Designator\",\"Footprint\"\n\"10k\",\"R1\",\"0402\"\n\n",
        )
        .unwrap();
        assert_eq!(doc.header.part_number, PART_NUMBER_HEADER);
        assert_eq!(doc.len(), 1);
        assert_eq!(
            doc.to_csv_string().unwrap(),
            "\"Comment\",\"Designator\",\"Footprint\",\"LCSC Part #\"\n\"10k\",\"R1\",\"0402\",\"\"\n"
        );
    }

    #[test]
    fn one_bad_row_rejects_document() {
        let result = BomDocument::parse("\"Comment\",\"Designator\",\"Footprint\"\n\"10k\"\n");
        assert!(matches!(result, Err(AssemblyError::InvalidBomLine { .. })));
    }

    #[test]
    fn empty_document_is_rejected() {
        assert!(BomDocument::parse("\n\n").is_err());
    }
}
