//! Centralized constants for the prospect-map crate
//!
//! Values shared between the pipeline, the engine client and the server.

/// Geometry encoding constants
pub mod geo {
    /// Decimal precision of every polyline the engine emits (1e-6 degrees)
    pub const POLYLINE_PRECISION: u32 = 6;
}

/// Density display constants
pub mod density {
    /// Prices below this are low-confidence and never labelled
    pub const PRICE_CONFIDENCE_THRESHOLD: f64 = 100.0;

    /// Sentinel a clamped price is rewritten to
    pub const NO_PRICE: f64 = 0.0;
}

/// Upstream engine API
pub mod engine {
    /// Environment variable holding the engine base URL
    pub const ENDPOINT_ENV: &str = "ENGINE_ENDPOINT";

    /// Environment variable holding the engine credential
    pub const API_KEY_ENV: &str = "ENGINE_API_KEY";

    /// Header carrying the credential
    pub const API_KEY_HEADER: &str = "x-api-key";

    /// Density + geometry search
    pub const DENSITY_PATH: &str = "/prospect/density";

    /// Single listing detail, followed by `/<platform_hash>`
    pub const LISTING_PATH: &str = "/prospect/listing";
}

/// Map widget identifiers
pub mod map {
    pub const GEOMETRY_SOURCE_ID: &str = "geometry-source";
    pub const GEOMETRY_FILL_LAYER_ID: &str = "geometry-fill";
    pub const GEOMETRY_OUTLINE_LAYER_ID: &str = "geometry-outline";
}
