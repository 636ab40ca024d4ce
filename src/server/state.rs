//! Server shared state
//!
//! Built once at startup and handed to every handler behind an `Arc`.

use crate::config::Config;
use crate::engine::EngineClient;
use crate::error::{Error, Result};
use crate::map::{FitOptions, InitialView};
use std::time::{Duration, Instant};

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration, with environment overrides already applied
    pub config: Config,

    /// Pooled HTTP client shared by every upstream request
    http: reqwest::Client,

    started_at: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.engine.timeout_secs))
            .build()
            .map_err(|e| Error::Server(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http,
            started_at: Instant::now(),
        })
    }

    /// Engine client over the shared pool
    ///
    /// Fails with `MissingConfig` when the endpoint or key is absent, so
    /// every request re-checks configuration instead of sending empty values.
    pub fn engine(&self) -> Result<EngineClient> {
        EngineClient::with_client(self.http.clone(), &self.config.engine)
    }

    pub fn fit_options(&self) -> FitOptions {
        FitOptions::from(&self.config.map)
    }

    pub fn initial_view(&self) -> InitialView {
        InitialView::from(&self.config.map)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
