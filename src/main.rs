//! pcbzip: package KiCad fabrication outputs for PCB manufacturers
//!
//! Builds vendor-ready gerber archives, previews them in a gerber viewer,
//! prepares BOM and placement files for assembly, and searches a local copy
//! of the parts catalog.

use std::error::Error as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

use pcbzip::assembly::{AssemblyError, AssemblyJob};
use pcbzip::catalog::{self, CatalogError, CsvCatalog, PartsCatalog, SearchQuery};
use pcbzip::config::{self, Config};
use pcbzip::error::ConfigError;
use pcbzip::gerber::{preview_archive, ArchiveBuilder, ExternalViewer, GerberError, Vendor};
use pcbzip::prompt::{ask_trimmed, choose_vendor, Answer, Prompt, StdioPrompt};
use pcbzip::setup::setup_instructions;
use pcbzip::{Error, Result};

/// Package KiCad gerber, drill, BOM and placement files for PCB manufacturers.
#[derive(Parser, Debug)]
#[command(name = "pcbzip")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(long, global = true, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show full error details instead of a one-line message
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Zip the gerber and drill files for a manufacturer, then preview them
    Build {
        /// Directory holding the KiCad plot output
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Manufacturer (seedstudio, pcbway, jlcpcb-v5, jlcpcb-v6); asked for if omitted
        #[arg(long, value_parser = parse_vendor)]
        vendor: Option<Vendor>,

        /// Project name; asked for if omitted
        #[arg(long)]
        project: Option<String>,

        /// Board version; asked for if omitted
        #[arg(long = "board-version", value_name = "VERSION")]
        board_version: Option<String>,

        /// Do not preview the archive
        #[arg(long)]
        no_preview: bool,

        /// Gerber viewer (gerbv or gerbview)
        #[arg(long)]
        viewer: Option<ExternalViewer>,
    },

    /// Preview an existing archive in layer stacking order
    View {
        /// Archive to preview
        archive: PathBuf,

        /// Gerber viewer (gerbv or gerbview)
        #[arg(long)]
        viewer: Option<ExternalViewer>,
    },

    /// Prepare BOM and placement files for assembly
    Assembly {
        /// Directory holding the KiCad BOM and position exports
        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Project name; asked for if omitted
        #[arg(long)]
        project: Option<String>,

        /// Board version; asked for if omitted
        #[arg(long = "board-version", value_name = "VERSION")]
        board_version: Option<String>,

        /// Walk the BOM line by line to enter part numbers
        #[arg(short, long)]
        annotate: bool,
    },

    /// Search the parts catalog (interactive menu when no terms are given)
    Search {
        /// Search terms, all of which must match (`*` and `?` wildcards allowed)
        terms: Vec<String>,
    },

    /// Import a downloaded parts catalog CSV
    Refresh {
        /// Catalog CSV to import
        source: PathBuf,
    },

    /// Show the KiCad settings needed to produce the expected files
    Setup {
        /// Manufacturer; all are shown if omitted
        #[arg(long, value_parser = parse_vendor)]
        vendor: Option<Vendor>,
    },
}

fn parse_vendor(s: &str) -> std::result::Result<Vendor, String> {
    s.parse::<Vendor>().map_err(|_| {
        let names: Vec<&str> = Vendor::ALL.iter().map(|v| v.cli_name()).collect();
        format!("expected one of {} or 1-4", names.join(", "))
    })
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Asks for a value that was not given on the command line.
///
/// `Ok(None)` means input ended and the operator left.
fn ask_value(
    prompt: &mut dyn Prompt,
    given: Option<String>,
    question: &str,
) -> std::io::Result<Option<String>> {
    if given.is_some() {
        return Ok(given);
    }
    Ok(match ask_trimmed(prompt, question)? {
        Answer::Given(value) => Some(value),
        Answer::Closed => None,
    })
}

/// [`ask_value`] for the archive build, reporting failures as [`GerberError`].
fn ask_build_value(
    prompt: &mut dyn Prompt,
    given: Option<String>,
    question: &str,
) -> Result<String> {
    ask_value(prompt, given, question)
        .map_err(GerberError::prompt)?
        .ok_or_else(|| GerberError::UserAborted.into())
}

/// [`ask_value`] for assembly files, reporting failures as [`AssemblyError`].
fn ask_assembly_value(
    prompt: &mut dyn Prompt,
    given: Option<String>,
    question: &str,
) -> Result<String> {
    ask_value(prompt, given, question)
        .map_err(|source| AssemblyError::Prompt { source })?
        .ok_or_else(|| AssemblyError::UserAborted.into())
}

fn resolve_vendor(prompt: &mut dyn Prompt, given: Option<Vendor>) -> Result<Vendor> {
    match given {
        Some(vendor) => Ok(vendor),
        None => choose_vendor(prompt)?.ok_or_else(|| GerberError::UserAborted.into()),
    }
}

fn catalog_path(cfg: &Config) -> Result<PathBuf> {
    cfg.catalog
        .path
        .clone()
        .or_else(catalog::default_catalog_path)
        .ok_or_else(|| {
            CatalogError::NotFound {
                path: PathBuf::from("parts.csv"),
            }
            .into()
        })
}

fn run(command: Commands, cfg: &Config, config_path: Option<&Path>) -> Result<()> {
    let mut prompt = StdioPrompt;

    match command {
        Commands::Build {
            dir,
            vendor,
            project,
            board_version,
            no_preview,
            viewer,
        } => {
            let vendor = resolve_vendor(&mut prompt, vendor)?;
            let project = ask_build_value(&mut prompt, project, "Project name: ")?;
            let version = ask_build_value(&mut prompt, board_version, "Board version: ")?;

            let archive = ArchiveBuilder::new(vendor).build(&dir, &project, &version)?;
            println!("Created {}", archive.display());

            if !no_preview {
                preview_archive(&archive, &viewer.unwrap_or(cfg.viewer.program))?;
            }
        }

        Commands::View { archive, viewer } => {
            preview_archive(&archive, &viewer.unwrap_or(cfg.viewer.program))?;
        }

        Commands::Assembly {
            dir,
            project,
            board_version,
            annotate,
        } => {
            let project = ask_assembly_value(&mut prompt, project, "Project name: ")?;
            let version = ask_assembly_value(&mut prompt, board_version, "Board version: ")?;

            let job = AssemblyJob::new(project, version, dir);
            let report = job.process()?;
            for placement in &report.placements {
                println!("Created {}", placement.display());
            }
            if let Some(backup) = &report.backup {
                println!("Previous BOM saved as {}", backup.display());
            }
            println!(
                "Created {} ({} of {} lines have part numbers)",
                report.bom.display(),
                report.annotated_lines,
                report.bom_lines
            );

            if annotate {
                job.annotate(&mut prompt)?;
            }
        }

        Commands::Search { terms } => {
            let parts = CsvCatalog::open(&catalog_path(cfg)?)?;

            if terms.is_empty() {
                let save_path = config_path
                    .map(Path::to_path_buf)
                    .or_else(config::default_config_path)
                    .ok_or_else(|| ConfigError::ValidationError {
                        message: "no home directory for config.json".to_string(),
                    })?;
                let mut search = cfg.search.clone();
                let base = cfg.clone();
                catalog::run_search_menu(&parts, &mut search, &mut prompt, |settings| {
                    let mut updated = base.clone();
                    updated.search = settings.clone();
                    config::save_config(&updated, &save_path)
                })?;
            } else {
                let query = SearchQuery::parse(&terms.join(" "))?;
                let hits = parts.search(&query, &cfg.search);
                catalog::show_results(&mut prompt, &hits)?;
            }
        }

        Commands::Refresh { source } => {
            let dest = catalog_path(cfg)?;
            let count = catalog::refresh(&source, &dest)?;
            println!("Installed {count} parts into {}", dest.display());
        }

        Commands::Setup { vendor } => {
            let vendors = vendor.map_or_else(|| Vendor::ALL.to_vec(), |v| vec![v]);
            let text: Vec<String> = vendors.into_iter().map(setup_instructions).collect();
            print!("{}", text.join("\n"));
        }
    }
    Ok(())
}

/// Prints `err` as one line, or with its full source chain in debug mode.
fn report(err: &Error, debug: bool) {
    if let Error::Gerber(GerberError::MissingRequiredFiles { expected, missing }) = err {
        eprintln!("Expected filename extension list");
        for suffix in expected {
            eprintln!("  {suffix}");
        }
        eprintln!("Missing filename extension list");
        for suffix in missing {
            eprintln!("  {suffix}");
        }
    }

    if debug {
        eprintln!("error: {err:?}");
        let mut source = err.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
    } else {
        eprintln!("error: {err}");
    }
}

/// Entry point for pcbzip.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let config_path = args.config.as_deref();
    let cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            if config_path.is_none() {
                if let Some(default_path) = config::default_config_path() {
                    eprintln!("\nConfig read from: {}", default_path.display());
                }
            }
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);
    debug!(version = env!("CARGO_PKG_VERSION"), command = ?args.command, "Starting pcbzip");

    match run(args.command, &cfg, config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_interruption() => ExitCode::SUCCESS,
        Err(e) => {
            report(&e, args.debug);
            ExitCode::FAILURE
        }
    }
}
