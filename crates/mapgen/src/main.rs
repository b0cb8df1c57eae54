//! Static hazard map builder.
//!
//! Reads a YAML map description, assembles boundary, marker, heat, and
//! raster layers, and writes one self-contained HTML document. The
//! `convert` subcommand turns CSV observation exports into the GeoJSON
//! point files the heat layers read.

use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mapgen::config::MapConfig;
use mapgen::{build_plan, write_document};

#[derive(Parser, Debug)]
#[command(name = "mapgen")]
#[command(about = "Static hazard map builder")]
struct Args {
    /// Map configuration file path
    #[arg(short, long, default_value = "config/hazmap.yaml")]
    config: String,

    /// Output HTML file path
    #[arg(short, long, default_value = "map.html")]
    out: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a CSV of point observations to GeoJSON
    Convert {
        /// Input CSV file
        input: String,

        /// Output GeoJSON file
        output: String,

        /// CSV column holding longitudes
        #[arg(long, default_value = "longitude")]
        lon_column: String,

        /// CSV column holding latitudes
        #[arg(long, default_value = "latitude")]
        lat_column: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if let Some(Command::Convert {
        input,
        output,
        lon_column,
        lat_column,
    }) = &args.command
    {
        let count = ingest::convert_csv(
            Path::new(input),
            Path::new(output),
            lon_column,
            lat_column,
        )?;
        info!(points = count, output = %output, "Converted CSV to GeoJSON");
        return Ok(());
    }

    info!(config = %args.config, "Building map");

    let config = MapConfig::from_file(Path::new(&args.config))?;
    let plan = build_plan(&config)?;
    write_document(&plan, Path::new(&args.out))?;

    info!(out = %args.out, "Map build complete");

    Ok(())
}
