//! Map widget boundary
//!
//! The rendering widget itself lives outside this crate. [`MapView`] is the
//! narrow surface the pipeline drives: GeoJSON sources, styled layers and
//! camera fits. Registrations are scoped with [`GeometryLayer`] and camera
//! moves are fire-and-forget via [`spawn_camera`].

pub mod camera;
pub mod layer;

use crate::config::MapConfig;
use crate::error::Result;
use crate::geometry::{BoundingBox, GeoPoint};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use camera::{spawn_camera, CameraCommand};
pub use layer::GeometryLayer;

/// A map widget instance
///
/// All methods take `&self`; implementations synchronize internally so a
/// view can be shared with camera tasks.
pub trait MapView: Send + Sync {
    fn has_source(&self, id: &str) -> bool;

    /// Register a GeoJSON source
    fn add_source(&self, id: &str, data: Value) -> Result<()>;

    /// Replace the data of an existing source
    fn set_source_data(&self, id: &str, data: Value) -> Result<()>;

    fn remove_source(&self, id: &str) -> Result<()>;

    fn has_layer(&self, id: &str) -> bool;

    fn add_layer(&self, layer: LayerSpec) -> Result<()>;

    fn remove_layer(&self, id: &str) -> Result<()>;

    /// Animate the camera so `bounds` is fully visible
    fn fit_bounds(&self, bounds: BoundingBox, padding: u32, duration_ms: u64) -> Result<()>;
}

/// Paint of a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerPaint {
    Fill { color: String, opacity: f64 },
    Line { color: String, width: f64 },
}

/// A styled layer bound to a source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub id: String,
    pub source: String,
    pub paint: LayerPaint,
}

/// Search-area styling
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryStyle {
    pub fill_color: String,
    pub fill_opacity: f64,
    pub line_color: String,
    pub line_width: f64,
}

impl Default for GeometryStyle {
    fn default() -> Self {
        Self {
            fill_color: "#009de0".to_string(),
            fill_opacity: 0.1,
            line_color: "#009de0".to_string(),
            line_width: 2.0,
        }
    }
}

/// How the camera frames new results
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    pub padding: u32,
    pub duration_ms: u64,
    /// Wait before moving so freshly registered layers render first
    pub delay_ms: u64,
}

impl From<&MapConfig> for FitOptions {
    fn from(config: &MapConfig) -> Self {
        Self {
            padding: config.fit_padding,
            duration_ms: config.fit_duration_ms,
            delay_ms: config.fit_delay_ms,
        }
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self::from(&MapConfig::default())
    }
}

/// Where the map opens before any result is framed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialView {
    pub center: GeoPoint,
    pub zoom: f64,
}

impl From<&MapConfig> for InitialView {
    fn from(config: &MapConfig) -> Self {
        Self {
            center: GeoPoint::new(config.center_lng, config.center_lat),
            zoom: config.zoom,
        }
    }
}
