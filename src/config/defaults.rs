//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 3000;

/// Default upstream request timeout in seconds
pub const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 30;

/// Default named address searched before any polygon is drawn
pub const DEFAULT_ADDRESS_NAMES: &str = "Entroncamento";

/// Default search country
pub const DEFAULT_COUNTRY: &str = "pt";

/// Default listing type
pub const DEFAULT_AD_TYPE: &str = "sale";

/// Default map center longitude
pub const DEFAULT_CENTER_LNG: f64 = -8.22;

/// Default map center latitude
pub const DEFAULT_CENTER_LAT: f64 = 39.39;

/// Default map zoom
pub const DEFAULT_ZOOM: f64 = 6.0;

/// Padding around fitted bounds, in pixels
pub const DEFAULT_FIT_PADDING: u32 = 50;

/// Fit-bounds animation duration in milliseconds
pub const DEFAULT_FIT_DURATION_MS: u64 = 1000;

/// Delay before fitting so layers render first, in milliseconds
pub const DEFAULT_FIT_DELAY_MS: u64 = 100;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "prospect-map";
