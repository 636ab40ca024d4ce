//! prospect-map: real-estate density maps
//!
//! A library and CLI for exploring listing density from a prospect engine.
//! It decodes compressed search-area geometry, turns raw density samples into
//! priced point features, resolves whether a search targets a named address
//! or a user-drawn polygon, and proxies the engine for a browser map.
//!
//! ## Quick Start
//!
//! ```rust
//! use prospect_map::density::{build_density_collection, normalize_prices, RawDensitySample};
//! use prospect_map::format_price;
//!
//! let mut samples = vec![
//!     RawDensitySample::new(-8.5, 39.5, Some("42"), Some(250_000.0)),
//!     RawDensitySample::new(-8.6, 39.4, Some("43"), Some(50.0)),
//! ];
//! normalize_prices(&mut samples);
//!
//! let points = build_density_collection(&samples);
//! assert_eq!(points.features[0].properties.price, "250k");
//! assert_eq!(points.features[1].properties.price, "");
//! assert_eq!(format_price(1_250_000.0), "1.3M");
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod density;
pub mod draw;
pub mod engine;
pub mod error;
pub mod format;
pub mod geometry;
pub mod map;
pub mod query;
pub mod server;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use density::format_price;
pub use draw::{DrawCommand, DrawEvent, DrawMode, DrawSession};
pub use engine::{EngineClient, ProspectSource};
pub use error::{Error, Result};
pub use geometry::{GeoPoint, PolygonRings};
pub use query::{DensityQuery, SearchMode};
pub use session::{MapSession, MapSnapshot};
