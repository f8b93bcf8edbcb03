//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default station-metadata backend
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default backend request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default nearby radius in kilometers
pub const DEFAULT_RADIUS_KM: u32 = 100;

/// Override distance meaning "derive the threshold from the map scale"
pub const NO_OVERRIDE_DISTANCE: f64 = -1.0;

/// Default clustering strategy
pub const DEFAULT_STRATEGY: &str = "seed";

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7979;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "gnss-nearby";
