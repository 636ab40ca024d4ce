//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod density;
pub mod listing;
pub mod serve;
pub mod status;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Real-estate density map server and client
#[derive(Parser)]
#[command(name = "prospect-map")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Fetch density for the default address or a polygon
    Density(density::DensityArgs),

    /// Show one listing
    Listing(listing::ListingArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Show configuration and server status
    Status(status::StatusArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve::run(args).await,
        Commands::Density(args) => density::run(args).await,
        Commands::Listing(args) => listing::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::Status(args) => status::run(args).await,
    }
}

/// Log to stderr so command output on stdout stays clean
pub(crate) fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}
