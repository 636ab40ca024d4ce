//! Serve command handler
//!
//! Starts the HTTP server in foreground mode.

use crate::config::Config;
use crate::error::Result;
use crate::server;
use clap::Args;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Serve command arguments
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Engine base URL, overriding config and ENGINE_ENDPOINT
    #[arg(long)]
    pub endpoint: Option<String>,
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = Config::load()?;
    apply_overrides(&mut config, args);

    info!(
        "Starting prospect-map server v{} on {}",
        env!("CARGO_PKG_VERSION"),
        config.server_addr()
    );
    for problem in readiness_problems(&config) {
        // proxied requests answer 500 until this is fixed
        warn!("Engine not ready: {}", problem);
    }

    server::run(config).await
}

/// Command-line flags win over file and environment
fn apply_overrides(config: &mut Config, args: ServeArgs) {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(endpoint) = args.endpoint {
        config.engine.endpoint = Some(endpoint);
    }
}

/// Settings the proxies need that are still missing
fn readiness_problems(config: &Config) -> Vec<String> {
    [
        config.engine.require_endpoint().err(),
        config.engine.require_api_key().err(),
    ]
    .into_iter()
    .flatten()
    .map(|e| e.to_string())
    .collect()
}
