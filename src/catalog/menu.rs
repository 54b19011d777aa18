//! Interactive parts search menu.

use crate::catalog::error::{CatalogError, CatalogResult};
use crate::catalog::part::CatalogPart;
use crate::catalog::search::SearchQuery;
use crate::catalog::store::PartsCatalog;
use crate::config::SearchConfig;
use crate::error::ConfigError;
use crate::prompt::{ask_trimmed, Answer, Prompt};

fn prompt_err(source: std::io::Error) -> CatalogError {
    CatalogError::Prompt { source }
}

/// Writes a result listing through `prompt`.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn show_results(prompt: &mut dyn Prompt, hits: &[&CatalogPart]) -> CatalogResult<()> {
    if hits.is_empty() {
        return prompt.say("No matching parts.").map_err(prompt_err);
    }
    prompt
        .say(&format!(
            "{:<10} {:<8} {:>9} {:<24} {:<14} {}",
            "LCSC", "Type", "Stock", "MFR part", "Package", "Description"
        ))
        .map_err(prompt_err)?;
    for part in hits {
        prompt.say(&part.summary()).map_err(prompt_err)?;
    }
    Ok(())
}

fn ask_number<T: std::str::FromStr>(prompt: &mut dyn Prompt, question: &str) -> CatalogResult<Option<T>> {
    match ask_trimmed(prompt, question).map_err(prompt_err)? {
        Answer::Given(text) => {
            let value = text.parse().ok();
            if value.is_none() {
                prompt.say(&format!("'{text}' is not a number.")).map_err(prompt_err)?;
            }
            Ok(value)
        }
        Answer::Closed => Ok(None),
    }
}

/// Runs the search menu until the operator quits or input ends.
///
/// Settings changes apply to `config` immediately; `save` is called when the
/// operator asks to keep them.
///
/// # Errors
///
/// Returns an error if the prompt fails or `save` fails.
pub fn run_search_menu<F>(
    catalog: &dyn PartsCatalog,
    config: &mut SearchConfig,
    prompt: &mut dyn Prompt,
    mut save: F,
) -> CatalogResult<()>
where
    F: FnMut(&SearchConfig) -> Result<(), ConfigError>,
{
    loop {
        prompt.say("").map_err(prompt_err)?;
        prompt
            .say(&format!("Parts search ({} parts)", catalog.len()))
            .map_err(prompt_err)?;
        for line in [
            "  1: Search".to_string(),
            format!(
                "  2: Basic parts only: {}",
                if config.basic_only { "yes" } else { "no" }
            ),
            format!("  3: Minimum stock: {}", config.min_stock),
            format!("  4: Maximum results: {}", config.max_results),
            "  5: Save settings".to_string(),
            "  q: Quit".to_string(),
        ] {
            prompt.say(&line).map_err(prompt_err)?;
        }

        let Answer::Given(choice) = ask_trimmed(prompt, "Choice: ").map_err(prompt_err)? else {
            return Ok(());
        };

        match choice.to_lowercase().as_str() {
            "1" => {
                let Answer::Given(text) =
                    ask_trimmed(prompt, "Search terms: ").map_err(prompt_err)?
                else {
                    return Ok(());
                };
                match SearchQuery::parse(&text) {
                    Ok(query) => show_results(prompt, &catalog.search(&query, config))?,
                    Err(e) => prompt.say(&e.to_string()).map_err(prompt_err)?,
                }
            }
            "2" => config.basic_only = !config.basic_only,
            "3" => {
                if let Some(n) = ask_number(prompt, "Minimum stock: ")? {
                    config.min_stock = n;
                }
            }
            "4" => {
                if let Some(n) = ask_number::<usize>(prompt, "Maximum results: ")? {
                    if n == 0 {
                        prompt.say("Maximum results must be at least 1.").map_err(prompt_err)?;
                    } else {
                        config.max_results = n;
                    }
                }
            }
            "5" => {
                save(config)?;
                prompt.say("Settings saved.").map_err(prompt_err)?;
            }
            "q" => return Ok(()),
            other => prompt
                .say(&format!("Unknown choice '{other}'."))
                .map_err(prompt_err)?,
        }
    }
}
