//! prospect-map CLI entry point
//!
//! Density map proxy server + command-line client

use prospect_map::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
