use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use wikevents_scraper::observability::init_logging;
use wikevents_scraper::pipeline::{self, io};

#[derive(Parser)]
#[command(
    name = "wikevents-scraper",
    about = "Extracts dated event records from wikitext page dumps",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process an NDJSON page dump into dated event records
    Process {
        /// Input NDJSON file, one {"title", "text"} object per line
        #[arg(long)]
        input: PathBuf,
        /// Output JSON file of page records
        #[arg(long)]
        output: PathBuf,
        /// Side-channel JSON file for dates that failed to normalize
        #[arg(long, default_value = "bad-dates.json")]
        bad_dates: PathBuf,
        /// Worker thread count, defaulting to available parallelism
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Normalize one date string and print the structured result
    CheckDate {
        /// Raw date text as it would appear in an infobox
        date: String,
        /// Page title supplying year context for partial dates
        #[arg(long, default_value = "")]
        title: String,
        /// Year context as a separate infobox field would supply it
        #[arg(long)]
        year: Option<i32>,
    },
}

fn main() -> Result<()> {
    init_logging();

    match Cli::parse().command {
        Commands::Process {
            input,
            output,
            bad_dates,
            threads,
        } => run_process(&input, &output, &bad_dates, threads),
        Commands::CheckDate { date, title, year } => {
            let parsed = wikevents_scraper::dates::normalize(&date, &title, year)?;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
            Ok(())
        }
    }
}

fn run_process(
    input: &Path,
    output: &Path,
    bad_dates: &Path,
    threads: Option<usize>,
) -> Result<()> {
    let pages = io::read_pages(input)
        .with_context(|| format!("reading page dump {}", input.display()))?;
    info!(pages = pages.len(), input = %input.display(), "loaded page dump");

    let threads = threads.unwrap_or_else(pipeline::default_threads);
    let batch = pipeline::process_pages(&pages, threads);

    io::write_json(output, &batch.pages)
        .with_context(|| format!("writing events to {}", output.display()))?;
    io::write_json(bad_dates, &batch.bad_dates)
        .with_context(|| format!("writing bad dates to {}", bad_dates.display()))?;
    info!(
        pages = batch.pages.len(),
        parsed = batch.parsed_count,
        bad_dates = batch.bad_dates.len(),
        "wrote results"
    );
    Ok(())
}
