//! Density command handler
//!
//! Runs one density fetch through a map session and prints the snapshot.

use crate::cli::init_stderr_logging;
use crate::config::Config;
use crate::engine::EngineClient;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter};
use crate::map::FitOptions;
use crate::query::parse_rings;
use crate::session::MapSession;
use clap::Args;
use tracing::info;

/// Density command arguments
#[derive(Args)]
pub struct DensityArgs {
    /// Search polygon as JSON rings of [lng, lat] pairs
    #[arg(long)]
    pub polygon: Option<String>,

    /// Extra engine filter, repeatable (e.g. --filter asset_type=flat)
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Output format (json, text)
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Parse a `key=value` filter
fn parse_filter(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("Expected key=value, got '{}'", raw)),
    }
}

/// Run the density command
pub async fn run(args: DensityArgs) -> Result<()> {
    init_stderr_logging();

    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let formatter = get_formatter(&args.format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", args.format)))?;

    let config = Config::load()?;
    let polygon = args.polygon.as_deref().map(parse_rings).transpose()?;
    let engine = EngineClient::new(&config.engine)?;

    let mut session = MapSession::new(
        engine,
        config.search.clone(),
        FitOptions::from(&config.map),
    )
    .with_filters(args.filters);
    if let Some(rings) = polygon {
        session = session.with_polygon(rings);
    }

    info!("Fetching density from {}", session.source().endpoint());
    session.refresh().await?;

    let snapshot = session
        .into_snapshot()
        .ok_or_else(|| Error::InvalidPayload("No snapshot was produced".to_string()))?;
    let output = formatter.format(&snapshot)?;

    // Write output
    if let Some(path) = args.output {
        std::fs::write(&path, &output)?;
        eprintln!("Output written to {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}
