//! Geographic primitives and GeoJSON assembly
//!
//! This module handles:
//! - Decoding engine polylines into coordinate rings
//! - Assembling polygon / multipolygon feature collections
//! - Bounding boxes for camera fitting

pub mod assemble;
pub mod feature;
pub mod polyline;

use serde::{Deserialize, Serialize};

pub use feature::{Feature, FeatureCollection, Geometry, NoProperties};

/// A geographic position in GeoJSON order (longitude, latitude)
///
/// Serialized as a `[lng, lat]` pair. Range is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    pub lng: f64,
    pub lat: f64,
}

impl GeoPoint {
    /// Create a new point
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Build from a decoder pair, which is latitude-first
    pub fn from_lat_lng((lat, lng): (f64, f64)) -> Self {
        Self { lng, lat }
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(point: GeoPoint) -> Self {
        [point.lng, point.lat]
    }
}

/// An ordered ring of positions
pub type Ring = Vec<GeoPoint>;

/// A polygon as a sequence of rings (outer ring first)
pub type PolygonRings = Vec<Ring>;

/// Axis-aligned extent of a set of positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Compute the extent of the given points, or None if there are none
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GeoPoint>,
    {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Self {
                    min_lng: p.lng,
                    min_lat: p.lat,
                    max_lng: p.lng,
                    max_lat: p.lat,
                },
                Some(b) => Self {
                    min_lng: b.min_lng.min(p.lng),
                    min_lat: b.min_lat.min(p.lat),
                    max_lng: b.max_lng.max(p.lng),
                    max_lat: b.max_lat.max(p.lat),
                },
            })
        })
    }

    /// `[west, south, east, north]`, the order map widgets expect
    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lng, self.min_lat, self.max_lng, self.max_lat]
    }

    /// Center of the box
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lng + self.max_lng) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_serializes_lng_first() {
        let p = GeoPoint::new(-8.5, 39.5);
        assert_eq!(serde_json::to_string(&p).unwrap(), "[-8.5,39.5]");

        let parsed: GeoPoint = serde_json::from_str("[-9.1,38.7]").unwrap();
        assert_eq!(parsed, GeoPoint::new(-9.1, 38.7));
    }

    #[test]
    fn test_from_lat_lng_swaps() {
        let p = GeoPoint::from_lat_lng((39.5, -8.5));
        assert_eq!(p.lng, -8.5);
        assert_eq!(p.lat, 39.5);
    }

    #[test]
    fn test_bounding_box() {
        let points = vec![
            GeoPoint::new(-9.0, 38.0),
            GeoPoint::new(-8.0, 40.0),
            GeoPoint::new(-8.5, 39.0),
        ];
        let bbox = BoundingBox::from_points(&points).unwrap();
        assert_eq!(bbox.to_array(), [-9.0, 38.0, -8.0, 40.0]);
        assert_eq!(bbox.center(), GeoPoint::new(-8.5, 39.0));
    }

    #[test]
    fn test_bounding_box_empty() {
        let points: Vec<GeoPoint> = Vec::new();
        assert!(BoundingBox::from_points(&points).is_none());
    }
}
