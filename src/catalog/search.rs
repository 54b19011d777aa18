//! Catalog search terms and ranking.

use std::cmp::Reverse;

use regex::Regex;

use crate::catalog::error::{CatalogError, CatalogResult};
use crate::catalog::part::CatalogPart;
use crate::config::SearchConfig;

/// Converts a glob (`*`, `?`) to a regex body.
fn glob_to_regex(glob: &str) -> String {
    let mut regex = String::with_capacity(glob.len() * 2);
    for c in glob.chars() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            '.' | '+' | '^' | '$' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\' => {
                regex.push('\\');
                regex.push(c);
            }
            _ => regex.push(c),
        }
    }
    regex
}

#[derive(Debug, Clone)]
enum Term {
    /// Lower-cased substring.
    Contains(String),
    /// Anchored, case-insensitive glob.
    Glob(Regex),
}

impl Term {
    fn matches(&self, field: &str) -> bool {
        match self {
            Self::Contains(needle) => field.to_lowercase().contains(needle.as_str()),
            Self::Glob(regex) => regex.is_match(field),
        }
    }
}

/// A parsed search: every term must match some field of a part.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    terms: Vec<Term>,
}

impl SearchQuery {
    /// Parses whitespace-separated terms. Terms containing `*` or `?` are globs
    /// matched against a whole field; others are substrings.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Pattern`] if a glob cannot be compiled.
    pub fn parse(text: &str) -> CatalogResult<Self> {
        let terms = text
            .split_whitespace()
            .map(|word| {
                if word.contains(['*', '?']) {
                    Regex::new(&format!("(?i)^{}$", glob_to_regex(word)))
                        .map(Term::Glob)
                        .map_err(|source| CatalogError::Pattern {
                            pattern: word.to_string(),
                            source,
                        })
                } else {
                    Ok(Term::Contains(word.to_lowercase()))
                }
            })
            .collect::<CatalogResult<Vec<_>>>()?;
        Ok(Self { terms })
    }

    /// Returns `true` if there are no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns `true` if every term matches at least one searchable field.
    #[must_use]
    pub fn matches(&self, part: &CatalogPart) -> bool {
        let fields = part.searchable_fields();
        self.terms
            .iter()
            .all(|term| fields.iter().any(|field| term.matches(field)))
    }
}

/// Filters and ranks `parts`: basic parts first, then by stock, highest first.
pub fn rank<'a, I>(parts: I, query: &SearchQuery, config: &SearchConfig) -> Vec<&'a CatalogPart>
where
    I: IntoIterator<Item = &'a CatalogPart>,
{
    let mut found: Vec<&CatalogPart> = parts
        .into_iter()
        .filter(|p| !config.basic_only || p.is_basic())
        .filter(|p| p.stock() >= config.min_stock)
        .filter(|p| query.matches(p))
        .collect();

    found.sort_by_key(|p| (Reverse(p.is_basic()), Reverse(p.stock())));
    found.truncate(config.max_results);
    found
}
