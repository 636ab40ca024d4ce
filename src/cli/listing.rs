//! Listing command handler
//!
//! Fetches one listing from the engine and prints a summary.

use crate::cli::init_stderr_logging;
use crate::config::Config;
use crate::engine::{EngineClient, ListingSummary, ProspectSource};
use crate::error::Result;
use clap::Args;

/// Listing command arguments
#[derive(Args)]
pub struct ListingArgs {
    /// Listing identifier (platform hash)
    pub platform_hash: String,

    /// Print the engine response as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the listing command
pub async fn run(args: ListingArgs) -> Result<()> {
    init_stderr_logging();

    let config = Config::load()?;
    let engine = EngineClient::new(&config.engine)?;
    let details = engine.listing(&args.platform_hash).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&details)?);
    } else {
        print!("{}", render_summary(&details.summary("")));
    }

    Ok(())
}

fn render_summary(summary: &ListingSummary) -> String {
    let mut output = format!("{}\n", summary.title);

    if !summary.price.is_empty() {
        output.push_str(&format!("  Price: {}\n", summary.price));
    }
    if let Some(asset_type) = &summary.asset_type {
        output.push_str(&format!("  Type: {}\n", asset_type));
    }

    let facts: Vec<String> = [
        summary.bedrooms.map(|n| format!("{} bed", n)),
        summary.bathrooms.map(|n| format!("{} bath", n)),
        summary.area.map(|a| format!("{} m²", a)),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !facts.is_empty() {
        output.push_str(&format!("  {}\n", facts.join(" · ")));
    }

    if let Some(url) = &summary.url {
        output.push_str(&format!("  Listing: {}\n", url));
    }
    if let Some(image) = &summary.image {
        output.push_str(&format!("  Image: {}\n", image));
    }
    if let Some(directions) = &summary.directions_url {
        output.push_str(&format!("  Directions: {}\n", directions));
    }

    output
}
