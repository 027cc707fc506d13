#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for inspecting a help-request dataset.
//!
//! Loads the boundary and event files the same way the server does and
//! prints a cleaning and coverage report, making the silent drops of the
//! cleaning pass visible before the data goes live.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use relief_map_analytics::{Dataset, FilteredSet, summarize, trend_bucket_width};
use relief_map_request_models::CategoryField;

#[derive(Parser)]
#[command(name = "relief_map_ingest", about = "Help request dataset inspection tool")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the dataset and print a cleaning and coverage report
    Stats {
        /// Path to the event CSV file
        #[arg(long, default_value = "data/help_requests.csv")]
        events: PathBuf,
        /// Path to the boundary GeoJSON file
        #[arg(long, default_value = "data/boundaries.json")]
        boundaries: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Stats {
        events: PathBuf::from("data/help_requests.csv"),
        boundaries: PathBuf::from("data/boundaries.json"),
    }) {
        Commands::Stats { events, boundaries } => run_stats(&events, &boundaries),
    }
}

fn run_stats(events: &Path, boundaries: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let boundary_data = relief_map_geography::load_boundaries(boundaries)?;
    let (requests, drops) = relief_map_ingest::load_events(events, &boundary_data.catalog)?;
    let dataset = Dataset::new(requests);

    println!("Regions in catalog: {}", boundary_data.catalog.len());
    println!("Rows kept: {}", dataset.len());
    println!(
        "Rows dropped: {} ({} missing timestamps, {} unresolvable regions, {} malformed)",
        drops.total(),
        drops.missing_timestamp,
        drops.unknown_region,
        drops.malformed
    );

    for field in CategoryField::all() {
        let values = dataset.domain(*field).values().join(", ");
        println!("Observed {field} values: [{values}]");
    }

    let rows = FilteredSet::all(&dataset);
    let summary = summarize(&rows, trend_bucket_width());

    if let (Some(first), Some(last)) = (summary.series.first(), summary.series.last()) {
        println!("Timestamp span: {} .. {}", first.period, last.period);
    }

    println!("Requests per region:");
    for entry in &summary.by_region {
        println!("  {:>6}  {}", entry.count, entry.category);
    }

    Ok(())
}
