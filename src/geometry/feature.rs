//! GeoJSON feature types
//!
//! Only the subset the map widget consumes: points, polygons and
//! multipolygons inside a feature collection.

use crate::geometry::{BoundingBox, GeoPoint, Ring};
use serde::{Deserialize, Serialize};

/// GeoJSON geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: GeoPoint },
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
}

impl Geometry {
    /// Iterate every position in this geometry
    pub fn positions(&self) -> Box<dyn Iterator<Item = &GeoPoint> + '_> {
        match self {
            Geometry::Point { coordinates } => Box::new(std::iter::once(coordinates)),
            Geometry::Polygon { coordinates } => Box::new(coordinates.iter().flatten()),
            Geometry::MultiPolygon { coordinates } => {
                Box::new(coordinates.iter().flatten().flatten())
            }
        }
    }
}

/// Empty property bag, serialized as `{}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoProperties {}

/// A GeoJSON feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature<P> {
    pub geometry: Geometry,
    pub properties: P,
}

impl<P> Feature<P> {
    pub fn new(geometry: Geometry, properties: P) -> Self {
        Self {
            geometry,
            properties,
        }
    }
}

/// A GeoJSON feature collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection<P> {
    pub features: Vec<Feature<P>>,
}

impl<P> Default for FeatureCollection<P> {
    fn default() -> Self {
        Self {
            features: Vec::new(),
        }
    }
}

impl<P> FeatureCollection<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, feature: Feature<P>) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// No features means nothing to render, never an error
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Extent of every position in the collection
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.features.iter().flat_map(|f| f.geometry.positions()))
    }
}
