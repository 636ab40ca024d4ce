//! Upstream prospect engine
//!
//! Payload types for the density and listing endpoints, the validated parse
//! boundary for density responses, and the [`ProspectSource`] trait the map
//! session fetches through.

pub mod client;

use crate::density::RawDensitySample;
use crate::error::{Error, Result};
use crate::geometry::assemble::RawGeometryEntry;
use crate::query::DensityQuery;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use client::EngineClient;

/// Trait for density / listing data sources
pub trait ProspectSource: Send + Sync {
    /// Fetch density samples and search-area geometry
    fn density(
        &self,
        query: &DensityQuery,
    ) -> impl std::future::Future<Output = Result<DensityPayload>> + Send;

    /// Fetch one listing by platform hash
    fn listing(
        &self,
        platform_hash: &str,
    ) -> impl std::future::Future<Output = Result<ListingDetails>> + Send;
}

/// Validated density response
///
/// `{ data: RawDensitySample[], geometry: RawGeometryEntry[], total: number }`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DensityPayload {
    #[serde(default)]
    pub data: Vec<RawDensitySample>,
    #[serde(default)]
    pub geometry: Vec<RawGeometryEntry>,
    #[serde(default)]
    pub total: u64,
}

impl DensityPayload {
    /// Parse an engine body, rejecting shapes the pipeline cannot use
    ///
    /// Missing fields default to empty. Present fields of the wrong type
    /// (e.g. `data` that is not an array) are rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut body) = value else {
            return Err(Error::InvalidPayload(
                "Density response is not a JSON object".to_string(),
            ));
        };

        for field in ["data", "geometry"] {
            match body.get(field) {
                None | Some(Value::Null) => {
                    body.remove(field);
                }
                Some(Value::Array(_)) => {}
                Some(_) => {
                    return Err(Error::InvalidPayload(format!(
                        "Density response field '{}' is not an array",
                        field
                    )))
                }
            }
        }

        // Engines have sent fractional and null totals
        let total = match body.remove("total") {
            None | Some(Value::Null) => 0,
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
                .unwrap_or(0),
            Some(_) => {
                return Err(Error::InvalidPayload(
                    "Density response field 'total' is not a number".to_string(),
                ))
            }
        };

        let mut payload: DensityPayload = serde_json::from_value(Value::Object(body))
            .map_err(|e| Error::InvalidPayload(format!("Malformed density response: {}", e)))?;
        payload.total = total;
        Ok(payload)
    }
}

/// Listing detail as returned by the engine
///
/// Every field is optional; unknown fields are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    /// `[lng, lat]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Display-ready view of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingSummary {
    pub title: String,
    /// Engine price, or the map label when the engine has none
    pub price: String,
    pub image: Option<String>,
    pub url: Option<String>,
    pub asset_type: Option<String>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub area: Option<f64>,
    pub directions_url: Option<String>,
}

impl ListingDetails {
    /// Summarize for display, using `fallback_price` when no price is given
    pub fn summary(&self, fallback_price: &str) -> ListingSummary {
        let non_empty = |s: &Option<String>| s.clone().filter(|v| !v.is_empty());

        let image = self
            .images
            .as_ref()
            .and_then(|images| images.first().cloned())
            .filter(|v| !v.is_empty())
            .or_else(|| non_empty(&self.image));

        ListingSummary {
            title: non_empty(&self.title)
                .or_else(|| non_empty(&self.address))
                .unwrap_or_else(|| "Property".to_string()),
            price: non_empty(&self.price).unwrap_or_else(|| fallback_price.to_string()),
            image,
            url: non_empty(&self.url).or_else(|| non_empty(&self.link)),
            asset_type: non_empty(&self.asset_type),
            bedrooms: self.bedrooms.filter(|v| *v > 0.0),
            bathrooms: self.bathrooms.filter(|v| *v > 0.0),
            area: self.area.filter(|v| *v > 0.0),
            directions_url: self.coordinates.map(|[lng, lat]| {
                format!(
                    "https://www.google.com/maps/dir/?api=1&destination={},{}",
                    lat, lng
                )
            }),
        }
    }
}
