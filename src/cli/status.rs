//! Status command handler
//!
//! Shows configuration completeness and probes a running server.

use crate::cli::config::mask_secret;
use crate::config::Config;
use crate::error::Result;
use clap::Args;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Check if server is running (tries to connect)
    #[arg(long)]
    pub server: bool,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = Config::load()?;

    println!("prospect-map v{}", env!("CARGO_PKG_VERSION"));
    println!("Config: {}", Config::config_path()?.display());
    println!();

    println!("Engine:");
    println!(
        "  Endpoint: {}",
        config.engine.endpoint.as_deref().unwrap_or("not set")
    );
    println!("  API key:  {}", mask_secret(config.engine.api_key.as_deref()));
    println!(
        "  Ready:    {}",
        if config.engine.is_complete() { "YES" } else { "NO" }
    );
    println!();

    println!("Default search:");
    println!(
        "  {} [{}, {}]",
        config.search.address_names, config.search.country, config.search.ad_type
    );
    if config.search.address_ids.is_empty() {
        println!("  Address ids: none");
    } else {
        println!("  Address ids: {}", config.search.address_ids.join(","));
    }
    println!();

    // Check server status if requested
    if args.server {
        check_server_status(&config).await;
    }

    Ok(())
}

/// Check if the server is running
async fn check_server_status(config: &Config) {
    let url = format!("http://{}/api/status", config.server_addr());

    match reqwest::get(&url).await {
        Ok(response) => {
            if response.status().is_success() {
                println!("Server: RUNNING on {}", config.server_addr());
                if let Ok(status) = response.json::<serde_json::Value>().await {
                    if let Some(version) = status.get("version").and_then(|v| v.as_str()) {
                        println!("  Version: {}", version);
                    }
                    if let Some(ready) = status.get("engine_configured").and_then(|v| v.as_bool()) {
                        println!("  Engine configured: {}", ready);
                    }
                }
            } else {
                println!("Server: ERROR (status {})", response.status());
            }
        }
        Err(_) => {
            println!("Server: NOT RUNNING on {}", config.server_addr());
        }
    }
    println!();
}
