//! Scoped search-area layer
//!
//! Attaching registers the geometry source with its fill and outline layers;
//! dropping the guard removes them again. The guard only holds a weak
//! reference, so a view that was torn down first makes release a no-op.

use crate::constants::map::{
    GEOMETRY_FILL_LAYER_ID, GEOMETRY_OUTLINE_LAYER_ID, GEOMETRY_SOURCE_ID,
};
use crate::error::Result;
use crate::geometry::{FeatureCollection, NoProperties};
use crate::map::{GeometryStyle, LayerPaint, LayerSpec, MapView};
use std::sync::{Arc, Weak};
use tracing::debug;

/// Registration of the search-area layers on one view
#[derive(Debug)]
pub struct GeometryLayer<V: MapView> {
    view: Weak<V>,
}

impl<V: MapView> GeometryLayer<V> {
    /// Register (or refresh) the geometry source and its layers
    pub fn attach(
        view: &Arc<V>,
        geometry: &FeatureCollection<NoProperties>,
        style: &GeometryStyle,
    ) -> Result<Self> {
        let layer = Self {
            view: Arc::downgrade(view),
        };
        // If registration fails midway the guard's Drop releases what was added
        layer.register(view, geometry, style)?;
        Ok(layer)
    }

    /// Replace the rendered geometry
    pub fn update(&self, geometry: &FeatureCollection<NoProperties>) -> Result<()> {
        match self.view.upgrade() {
            Some(view) => view.set_source_data(GEOMETRY_SOURCE_ID, serde_json::to_value(geometry)?),
            None => Ok(()),
        }
    }

    fn register(
        &self,
        view: &V,
        geometry: &FeatureCollection<NoProperties>,
        style: &GeometryStyle,
    ) -> Result<()> {
        let data = serde_json::to_value(geometry)?;
        if view.has_source(GEOMETRY_SOURCE_ID) {
            view.set_source_data(GEOMETRY_SOURCE_ID, data)?;
        } else {
            view.add_source(GEOMETRY_SOURCE_ID, data)?;
        }

        if !view.has_layer(GEOMETRY_FILL_LAYER_ID) {
            view.add_layer(LayerSpec {
                id: GEOMETRY_FILL_LAYER_ID.to_string(),
                source: GEOMETRY_SOURCE_ID.to_string(),
                paint: LayerPaint::Fill {
                    color: style.fill_color.clone(),
                    opacity: style.fill_opacity,
                },
            })?;
        }

        if !view.has_layer(GEOMETRY_OUTLINE_LAYER_ID) {
            view.add_layer(LayerSpec {
                id: GEOMETRY_OUTLINE_LAYER_ID.to_string(),
                source: GEOMETRY_SOURCE_ID.to_string(),
                paint: LayerPaint::Line {
                    color: style.line_color.clone(),
                    width: style.line_width,
                },
            })?;
        }

        Ok(())
    }
}

impl<V: MapView> Drop for GeometryLayer<V> {
    fn drop(&mut self) {
        let Some(view) = self.view.upgrade() else {
            debug!("Map view already gone, nothing to release");
            return;
        };

        // Layers before the source they read from
        for id in [GEOMETRY_OUTLINE_LAYER_ID, GEOMETRY_FILL_LAYER_ID] {
            if view.has_layer(id) {
                if let Err(e) = view.remove_layer(id) {
                    debug!("Failed to remove layer {}: {}", id, e);
                }
            }
        }
        if view.has_source(GEOMETRY_SOURCE_ID) {
            if let Err(e) = view.remove_source(GEOMETRY_SOURCE_ID) {
                debug!("Failed to remove source {}: {}", GEOMETRY_SOURCE_ID, e);
            }
        }
    }
}
