//! Error types for prospect-map

use thiserror::Error;

/// Main error type for prospect-map operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required engine setting absent at request time
    #[error("{0}")]
    MissingConfig(String),

    /// The engine could not be reached at all
    #[error("Upstream connection failed: {0}")]
    UpstreamConnect(String),

    /// The engine answered with a non-success status
    #[error("Upstream returned status {status}")]
    UpstreamStatus {
        status: u16,
        details: serde_json::Value,
    },

    /// The engine answered with a body that is not JSON
    #[error("Upstream response is not valid JSON: {0}")]
    UpstreamParse(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Cannot {command} while {mode}")]
    InvalidTransition { mode: String, command: String },

    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),

    /// The map widget rejected an operation
    #[error("Map view error: {0}")]
    MapView(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Result type alias for prospect-map operations
pub type Result<T> = std::result::Result<T, Error>;
