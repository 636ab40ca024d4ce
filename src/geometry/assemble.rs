//! Search-area assembly
//!
//! Turns the engine's encoded geometry entries into a feature collection the
//! map can draw as an outline. Decoder pairs are latitude-first and are
//! swapped to `[lng, lat]` here.

use crate::constants::geo::POLYLINE_PRECISION;
use crate::geometry::feature::{Feature, FeatureCollection, Geometry, NoProperties};
use crate::geometry::polyline;
use crate::geometry::{GeoPoint, Ring};
use serde::Deserialize;
use serde_json::Value;

/// One geometry entry as the engine sends it
///
/// `{"type": "Polygon" | "MultiPolygon", "polyline": ["<encoded>", ...]}`.
/// Parsing never fails: an entry of any other shape is `Unsupported`, and a
/// ring that is not a string is kept as an empty ring.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum RawGeometryEntry {
    /// Only the first ring is meaningful
    Polygon { polyline: Vec<String> },
    /// One ring per sub-polygon
    MultiPolygon { polyline: Vec<String> },
    Unsupported,
}

impl From<Value> for RawGeometryEntry {
    fn from(value: Value) -> Self {
        let Value::Object(entry) = value else {
            return RawGeometryEntry::Unsupported;
        };

        let polyline = || -> Vec<String> {
            match entry.get("polyline") {
                Some(Value::Array(rings)) => rings
                    .iter()
                    .map(|ring| ring.as_str().unwrap_or_default().to_string())
                    .collect(),
                _ => Vec::new(),
            }
        };

        match entry.get("type").and_then(Value::as_str) {
            Some("Polygon") => RawGeometryEntry::Polygon {
                polyline: polyline(),
            },
            Some("MultiPolygon") => RawGeometryEntry::MultiPolygon {
                polyline: polyline(),
            },
            _ => RawGeometryEntry::Unsupported,
        }
    }
}

/// Decode one polyline into a `[lng, lat]` ring
///
/// Returns None when nothing decodes, so callers skip the entry.
pub fn decode_ring(encoded: &str) -> Option<Ring> {
    let ring: Ring = polyline::decode(encoded, POLYLINE_PRECISION)
        .into_iter()
        .map(GeoPoint::from_lat_lng)
        .collect();

    if ring.is_empty() {
        None
    } else {
        Some(ring)
    }
}

/// Build the geometry feature collection for a set of engine entries
///
/// Never fails. An input where every entry is skipped produces an empty
/// collection.
pub fn build_geometry_collection(entries: &[RawGeometryEntry]) -> FeatureCollection<NoProperties> {
    let mut collection = FeatureCollection::new();

    for entry in entries {
        let geometry = match entry {
            RawGeometryEntry::Polygon { polyline } => polyline
                .first()
                .and_then(|encoded| decode_ring(encoded))
                .map(|ring| Geometry::Polygon {
                    coordinates: vec![ring],
                }),
            RawGeometryEntry::MultiPolygon { polyline } => {
                let polygons: Vec<Vec<Ring>> = polyline
                    .iter()
                    .filter_map(|encoded| decode_ring(encoded))
                    .map(|ring| vec![ring])
                    .collect();

                if polygons.is_empty() {
                    None
                } else {
                    Some(Geometry::MultiPolygon {
                        coordinates: polygons,
                    })
                }
            }
            RawGeometryEntry::Unsupported => None,
        };

        if let Some(geometry) = geometry {
            collection.push(Feature::new(geometry, NoProperties::default()));
        }
    }

    collection
}
