///
/// This module implements the CLI interface for kanpo-downloader: command
/// parsing, argument validation and user-visible output.
///
/// All listing logic (fetch with fallback, filename parsing, grouping) lives
/// in the [`kanpo-downloader-core`] crate. This module is CLI glue only.
///
/// ## How To Use
/// - For command-line users: run the installed `kanpo` binary with `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`kanpo-downloader-core`]: ../../kanpo-downloader-core/
use crate::load_config::load_config;
use crate::render::{render_json, render_text};
use crate::save::{save_files, select, Selection};
use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use kanpo_downloader_core::config::ListingConfig;
use kanpo_downloader_core::download::{build_client, FallbackTreeSource};
use kanpo_downloader_core::listing::DocumentType;
use kanpo_downloader_core::navigation::available_years;
use kanpo_downloader_core::session::{ListingSession, SessionSnapshot};
use std::path::PathBuf;
use std::time::Duration;

/// Gazette PDFs run to tens of megabytes; listings are small.
const PDF_TIMEOUT: Duration = Duration::from_secs(120);

/// CLI for kanpo-downloader: browse and download official gazette PDFs.
#[derive(Parser)]
#[clap(
    name = "kanpo",
    version,
    about = "Browse and download official gazette (官報) PDFs by year, month and date"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the years that can be selected
    Years {
        /// Path to an optional YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
    },
    /// Show a year's gazette files grouped by month, date and type
    List {
        /// Year to show (defaults to the current year)
        #[clap(long)]
        year: Option<i32>,
        /// Only show this month (1-12)
        #[clap(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        /// Print JSON instead of text
        #[clap(long)]
        json: bool,
        /// Path to an optional YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
    },
    /// Download a year's gazette PDFs
    Download {
        #[clap(long)]
        year: i32,
        /// Only files published on this date (YYYYMMDD)
        #[clap(long)]
        date: Option<String>,
        /// Only this document type: h, g, c, t, m or other
        #[clap(long, value_parser = parse_kind)]
        kind: Option<DocumentType>,
        /// Directory to save into (overrides the config file)
        #[clap(long)]
        output_dir: Option<PathBuf>,
        /// Path to an optional YAML config file
        #[clap(long)]
        config: Option<PathBuf>,
    },
}

fn parse_kind(s: &str) -> Result<DocumentType, String> {
    DocumentType::from_code(s)
        .ok_or_else(|| format!("unknown document type '{s}' (expected h, g, c, t, m or other)"))
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

fn check_year(year: i32, listing: &ListingConfig) -> Result<()> {
    let current = current_year();
    if year < listing.first_year || year > current {
        anyhow::bail!(
            "year {year} is not available (choose {}-{current})",
            listing.first_year
        );
    }
    Ok(())
}

async fn load_year(listing: &ListingConfig, year: i32) -> Result<SessionSnapshot> {
    let source = FallbackTreeSource::from_config(listing)?;
    let session = ListingSession::new(source, listing.repo());
    Ok(session.select_year(year).await)
}

/// Async CLI entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Years { config } => {
            let config = load_config(config)?;
            tracing::info!(command = "years", "Listing selectable years");
            for year in available_years(current_year(), config.listing.first_year) {
                println!("{year}");
            }
            Ok(())
        }
        Commands::List {
            year,
            month,
            json,
            config,
        } => {
            let config = load_config(config)?;
            let year = year.unwrap_or_else(current_year);
            check_year(year, &config.listing)?;
            tracing::info!(command = "list", year, ?month, "Loading listing");

            let snapshot = load_year(&config.listing, year).await?;
            if json {
                println!("{}", render_json(&snapshot, month)?);
            } else {
                print!("{}", render_text(&snapshot, month));
            }
            match snapshot.error {
                Some(e) => Err(anyhow::Error::msg(e)),
                None => Ok(()),
            }
        }
        Commands::Download {
            year,
            date,
            kind,
            output_dir,
            config,
        } => {
            let config = load_config(config)?;
            check_year(year, &config.listing)?;
            let output_dir = output_dir.unwrap_or(config.download.output_dir);
            tracing::info!(command = "download", year, ?date, ?kind, "Loading listing");

            let snapshot = load_year(&config.listing, year).await?;
            if let Some(e) = snapshot.error {
                tracing::error!(command = "download", error = %e, "Listing failed");
                return Err(anyhow::Error::msg(e));
            }

            let selection = Selection { date, kind };
            let files = select(&snapshot.listing, &selection);
            if files.is_empty() {
                println!("No matching files for {year}.");
                return Ok(());
            }

            let client = build_client(PDF_TIMEOUT)?;
            let report = save_files(&client, &files, &output_dir)
                .await
                .context("Download failed")?;
            println!(
                "Saved {} file(s), {} bytes, to {}",
                report.saved.len(),
                report.bytes,
                output_dir.display()
            );
            Ok(())
        }
    }
}
