//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::Result;
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "search.country")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    // Show path
    if args.path {
        let path = Config::config_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    // Reset config
    if args.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    // The file only; environment overrides must not be written back
    let mut config = Config::load_file()?;

    match (&args.key, &args.value) {
        // No arguments: show all config
        (None, None) => {
            show_all_config(&config);
        }

        // Key only: show that value
        (Some(key), None) => {
            if key == "engine.api_key" {
                println!("{}", mask_secret(config.engine.api_key.as_deref()));
            } else if let Some(value) = config.get(key) {
                println!("{}", value);
            } else {
                eprintln!("Unknown config key: {}", key);
                eprintln!("\nAvailable keys:");
                for k in Config::available_keys() {
                    eprintln!("  {}", k);
                }
                std::process::exit(1);
            }
        }

        // Key and value: set the value
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            if key == "engine.api_key" {
                println!("{} = {}", key, mask_secret(Some(value)));
            } else {
                println!("{} = {}", key, value);
            }
        }

        // Value without key: not valid
        (None, Some(_)) => {
            eprintln!("Error: Must specify a key to set a value");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Display all configuration values
fn show_all_config(config: &Config) {
    println!("[server]");
    println!("host = \"{}\"", config.server.host);
    println!("port = {}", config.server.port);
    println!();

    println!("[engine]");
    match &config.engine.endpoint {
        Some(endpoint) => println!("endpoint = \"{}\"", endpoint),
        None => println!("endpoint = \"\" # not configured"),
    }
    println!("api_key = {}", mask_secret(config.engine.api_key.as_deref()));
    println!("timeout_secs = {}", config.engine.timeout_secs);
    println!();

    println!("[search]");
    println!("address_names = \"{}\"", config.search.address_names);
    println!("address_ids = \"{}\"", config.search.address_ids.join(","));
    println!("country = \"{}\"", config.search.country);
    println!("ad_type = \"{}\"", config.search.ad_type);
    println!();

    println!("[map]");
    println!("center_lng = {}", config.map.center_lng);
    println!("center_lat = {}", config.map.center_lat);
    println!("zoom = {}", config.map.zoom);
    println!("fit_padding = {}", config.map.fit_padding);
    println!("fit_duration_ms = {}", config.map.fit_duration_ms);
    println!("fit_delay_ms = {}", config.map.fit_delay_ms);
}

/// Never echo a credential back
pub(crate) fn mask_secret(value: Option<&str>) -> &'static str {
    match value {
        Some(v) if !v.is_empty() => "\"***\" # configured",
        _ => "\"\" # not configured",
    }
}
