//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/prospect-map/config.toml
//!
//! `ENGINE_ENDPOINT` and `ENGINE_API_KEY` in the environment take precedence
//! over the `[engine]` section.

pub mod defaults;

use crate::constants::engine::{API_KEY_ENV, ENDPOINT_ENV};
use crate::error::{Error, Result};
use crate::query::SearchDefaults;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Named-address search defaults
    #[serde(default)]
    pub search: SearchDefaults,

    /// Camera settings
    #[serde(default)]
    pub map: MapConfig,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Upstream engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Engine credential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_engine_timeout")]
    pub timeout_secs: u64,
}

/// Camera settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_center_lng")]
    pub center_lng: f64,

    #[serde(default = "default_center_lat")]
    pub center_lat: f64,

    #[serde(default = "default_zoom")]
    pub zoom: f64,

    /// Padding around fitted bounds, in pixels
    #[serde(default = "default_fit_padding")]
    pub fit_padding: u32,

    /// Fit-bounds animation duration
    #[serde(default = "default_fit_duration")]
    pub fit_duration_ms: u64,

    /// Delay before a fit starts
    #[serde(default = "default_fit_delay")]
    pub fit_delay_ms: u64,
}

// Default value functions for serde
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_engine_timeout() -> u64 {
    DEFAULT_ENGINE_TIMEOUT_SECS
}
fn default_center_lng() -> f64 {
    DEFAULT_CENTER_LNG
}
fn default_center_lat() -> f64 {
    DEFAULT_CENTER_LAT
}
fn default_zoom() -> f64 {
    DEFAULT_ZOOM
}
fn default_fit_padding() -> u32 {
    DEFAULT_FIT_PADDING
}
fn default_fit_duration() -> u64 {
    DEFAULT_FIT_DURATION_MS
}
fn default_fit_delay() -> u64 {
    DEFAULT_FIT_DELAY_MS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_engine_timeout(),
        }
    }
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            address_names: DEFAULT_ADDRESS_NAMES.to_string(),
            address_ids: Vec::new(),
            country: DEFAULT_COUNTRY.to_string(),
            ad_type: DEFAULT_AD_TYPE.to_string(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lng: default_center_lng(),
            center_lat: default_center_lat(),
            zoom: default_zoom(),
            fit_padding: default_fit_padding(),
            fit_duration_ms: default_fit_duration(),
            fit_delay_ms: default_fit_delay(),
        }
    }
}

impl EngineConfig {
    /// Engine base URL, or a fatal error if unset
    pub fn require_endpoint(&self) -> Result<&str> {
        non_empty(&self.endpoint)
            .ok_or_else(|| Error::MissingConfig(format!("{} is not set", ENDPOINT_ENV)))
    }

    /// Engine credential, or a fatal error if unset
    pub fn require_api_key(&self) -> Result<&str> {
        non_empty(&self.api_key)
            .ok_or_else(|| Error::MissingConfig(format!("{} is not set", API_KEY_ENV)))
    }

    /// Whether both endpoint and key are present
    pub fn is_complete(&self) -> bool {
        self.require_endpoint().is_ok() && self.require_api_key().is_ok()
    }

    /// Override settings from environment-style lookups
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.is_empty()) {
            self.endpoint = Some(endpoint);
        }
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
            self.api_key = Some(key);
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path, then apply the environment
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.engine.apply_env_with(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load the file alone, without environment overrides
    pub fn load_file() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            // Create default config
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["engine", "endpoint"] => Some(self.engine.endpoint.clone().unwrap_or_default()),
            ["engine", "api_key"] => Some(self.engine.api_key.clone().unwrap_or_default()),
            ["engine", "timeout_secs"] => Some(self.engine.timeout_secs.to_string()),

            ["search", "address_names"] => Some(self.search.address_names.clone()),
            ["search", "address_ids"] => Some(self.search.address_ids.join(",")),
            ["search", "country"] => Some(self.search.country.clone()),
            ["search", "ad_type"] => Some(self.search.ad_type.clone()),

            ["map", "center_lng"] => Some(self.map.center_lng.to_string()),
            ["map", "center_lat"] => Some(self.map.center_lat.to_string()),
            ["map", "zoom"] => Some(self.map.zoom.to_string()),
            ["map", "fit_padding"] => Some(self.map.fit_padding.to_string()),
            ["map", "fit_duration_ms"] => Some(self.map.fit_duration_ms.to_string()),
            ["map", "fit_delay_ms"] => Some(self.map.fit_delay_ms.to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = parse_value(value, "port")?;
            }

            ["engine", "endpoint"] => {
                self.engine.endpoint = optional(value);
            }
            ["engine", "api_key"] => {
                self.engine.api_key = optional(value);
            }
            ["engine", "timeout_secs"] => {
                self.engine.timeout_secs = parse_value(value, "timeout")?;
            }

            ["search", "address_names"] => {
                self.search.address_names = value.to_string();
            }
            ["search", "address_ids"] => {
                self.search.address_ids = value
                    .split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            ["search", "country"] => {
                self.search.country = value.to_string();
            }
            ["search", "ad_type"] => {
                self.search.ad_type = value.to_string();
            }

            ["map", "center_lng"] => {
                self.map.center_lng = parse_value(value, "longitude")?;
            }
            ["map", "center_lat"] => {
                self.map.center_lat = parse_value(value, "latitude")?;
            }
            ["map", "zoom"] => {
                self.map.zoom = parse_value(value, "zoom")?;
            }
            ["map", "fit_padding"] => {
                self.map.fit_padding = parse_value(value, "padding")?;
            }
            ["map", "fit_duration_ms"] => {
                self.map.fit_duration_ms = parse_value(value, "duration")?;
            }
            ["map", "fit_delay_ms"] => {
                self.map.fit_delay_ms = parse_value(value, "delay")?;
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "server.host",
            "server.port",
            "engine.endpoint",
            "engine.api_key",
            "engine.timeout_secs",
            "search.address_names",
            "search.address_ids",
            "search.country",
            "search.ad_type",
            "map.center_lng",
            "map.center_lat",
            "map.zoom",
            "map.fit_padding",
            "map.fit_duration_ms",
            "map.fit_delay_ms",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {} value: {}", what, value)))
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
