//! Search query resolution
//!
//! A density search is either the configured named address or the polygon the
//! user drew, never both. This module builds the outbound parameters for
//! whichever mode is active.

use crate::error::{Error, Result};
use crate::geometry::{PolygonRings, Ring};
use serde::{Deserialize, Serialize};

/// Wire key for the named-address labels
pub const ADDRESS_NAMES_KEY: &str = "address_names";
/// Wire key for the comma-joined address ids
pub const ADDRESSES_KEY: &str = "addresses";
pub const COUNTRY_KEY: &str = "country";
pub const AD_TYPE_KEY: &str = "ad_type";
/// Wire key for the JSON ring sequence
pub const POLYGON_KEY: &str = "polygon";

/// Static query defaults for the named-address mode
///
/// Missing fields fall back to the configured defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    pub address_names: String,
    pub address_ids: Vec<String>,
    pub country: String,
    pub ad_type: String,
}

/// The active search mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SearchMode {
    NamedAddress {
        names: String,
        ids: String,
        country: String,
        ad_type: String,
    },
    DrawnPolygon {
        rings: PolygonRings,
        country: String,
        ad_type: String,
    },
}

/// Identity of a density request, used to detect superseded responses
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchKey {
    Default,
    /// Serialized ring sequence
    Polygon(String),
}

impl SearchMode {
    /// Pick the mode for the current polygon, falling back to the defaults
    pub fn resolve(polygon: Option<&PolygonRings>, defaults: &SearchDefaults) -> Self {
        match polygon {
            Some(rings) => SearchMode::DrawnPolygon {
                rings: rings.clone(),
                country: defaults.country.clone(),
                ad_type: defaults.ad_type.clone(),
            },
            None => SearchMode::NamedAddress {
                names: defaults.address_names.clone(),
                ids: defaults.address_ids.join(","),
                country: defaults.country.clone(),
                ad_type: defaults.ad_type.clone(),
            },
        }
    }

    /// Outbound query parameters for this mode
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        match self {
            SearchMode::NamedAddress {
                names,
                ids,
                country,
                ad_type,
            } => vec![
                (ADDRESS_NAMES_KEY.to_string(), names.clone()),
                (ADDRESSES_KEY.to_string(), ids.clone()),
                (COUNTRY_KEY.to_string(), country.clone()),
                (AD_TYPE_KEY.to_string(), ad_type.clone()),
            ],
            SearchMode::DrawnPolygon {
                rings,
                country,
                ad_type,
            } => vec![
                (COUNTRY_KEY.to_string(), country.clone()),
                (AD_TYPE_KEY.to_string(), ad_type.clone()),
                (POLYGON_KEY.to_string(), serialize_rings(rings)),
            ],
        }
    }

    /// Request-line key for this mode
    pub fn key(&self) -> SearchKey {
        match self {
            SearchMode::NamedAddress { .. } => SearchKey::Default,
            SearchMode::DrawnPolygon { rings, .. } => SearchKey::Polygon(serialize_rings(rings)),
        }
    }

    /// Whether this is the drawn-polygon mode
    pub fn is_polygon(&self) -> bool {
        matches!(self, SearchMode::DrawnPolygon { .. })
    }
}

/// Serialize rings as nested `[lng, lat]` arrays
pub fn serialize_rings(rings: &[Ring]) -> String {
    // A Vec of plain f64 pairs cannot fail to serialize
    serde_json::to_string(rings).unwrap_or_default()
}

/// Parse a `polygon` parameter back into rings
pub fn parse_rings(raw: &str) -> Result<PolygonRings> {
    let rings: PolygonRings = serde_json::from_str(raw)
        .map_err(|e| Error::InvalidPolygon(format!("Failed to parse polygon: {}", e)))?;

    if rings.is_empty() || rings.iter().any(|ring| ring.is_empty()) {
        return Err(Error::InvalidPolygon(
            "Polygon must contain at least one non-empty ring".to_string(),
        ));
    }

    Ok(rings)
}

/// A full density request: mode parameters plus passthrough filters
#[derive(Debug, Clone, PartialEq)]
pub struct DensityQuery {
    pub mode: SearchMode,
    pub filters: Vec<(String, String)>,
}

impl DensityQuery {
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            filters: Vec::new(),
        }
    }

    /// Attach passthrough filters (e.g. `asset_type`, `price`)
    pub fn with_filters(mut self, filters: Vec<(String, String)>) -> Self {
        self.filters = filters;
        self
    }

    /// All outbound parameters, mode keys first
    ///
    /// Filters that name a mode-owned key are dropped so a request can never
    /// carry both the address pair and a polygon.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.mode.query_pairs();
        pairs.extend(
            self.filters
                .iter()
                .filter(|(key, _)| !is_mode_key(key))
                .cloned(),
        );
        pairs
    }
}

fn is_mode_key(key: &str) -> bool {
    matches!(
        key,
        ADDRESS_NAMES_KEY | ADDRESSES_KEY | COUNTRY_KEY | AD_TYPE_KEY | POLYGON_KEY
    )
}
