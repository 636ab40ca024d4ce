//! HTTP client for the prospect engine
//!
//! Every request carries the `x-api-key` credential. Failures are split into
//! connection, upstream-status and unparseable-body errors so the proxy can
//! map each onto its own response.

use crate::config::EngineConfig;
use crate::constants::engine::{API_KEY_HEADER, DENSITY_PATH, LISTING_PATH};
use crate::engine::{DensityPayload, ListingDetails, ProspectSource};
use crate::error::{Error, Result};
use crate::query::DensityQuery;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Engine API client
#[derive(Debug, Clone)]
pub struct EngineClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl EngineClient {
    /// Create a client from engine settings
    ///
    /// Fails fast when the endpoint or key is missing rather than sending a
    /// request with an empty value.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Self::with_client(client, config)
    }

    /// Create a client that shares an existing connection pool
    pub fn with_client(client: reqwest::Client, config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            client,
            endpoint: config.require_endpoint()?.trim_end_matches('/').to_string(),
            api_key: config.require_api_key()?.to_string(),
        })
    }

    /// Base URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// GET `path` with a query string forwarded as-is
    pub async fn get_raw(&self, path: &str, raw_query: Option<&str>) -> Result<Value> {
        let url = match raw_query {
            Some(query) if !query.is_empty() => format!("{}{}?{}", self.endpoint, path, query),
            _ => format!("{}{}", self.endpoint, path),
        };
        self.send(self.client.get(&url)).await
    }

    /// GET `path` with encoded key/value parameters
    pub async fn get_with_pairs(&self, path: &str, pairs: &[(String, String)]) -> Result<Value> {
        let url = format!("{}{}", self.endpoint, path);
        self.send(self.client.get(&url).query(pairs)).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| Error::UpstreamConnect(e.to_string()))?;

        let status = response.status();
        debug!("Engine responded with {} for {}", status, response.url().path());

        if !status.is_success() {
            let details = response
                .json::<Value>()
                .await
                .unwrap_or_else(|_| serde_json::json!({ "message": "Unknown error" }));
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                details,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::UpstreamParse(e.to_string()))
    }
}

/// Path of a single listing
pub fn listing_path(platform_hash: &str) -> String {
    format!("{}/{}", LISTING_PATH, urlencoding::encode(platform_hash))
}

impl ProspectSource for EngineClient {
    async fn density(&self, query: &DensityQuery) -> Result<DensityPayload> {
        let body = self.get_with_pairs(DENSITY_PATH, &query.to_pairs()).await?;
        DensityPayload::from_value(body)
    }

    async fn listing(&self, platform_hash: &str) -> Result<ListingDetails> {
        let body = self.get_raw(&listing_path(platform_hash), None).await?;
        serde_json::from_value(body)
            .map_err(|e| Error::InvalidPayload(format!("Malformed listing response: {}", e)))
    }
}
