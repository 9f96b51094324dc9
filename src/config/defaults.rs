//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default search radius in miles
pub const DEFAULT_RADIUS_MILES: f64 = 10.0;

/// Upper bound on any requested radius in miles
pub const DEFAULT_MAX_RADIUS_MILES: f64 = 10.0;

/// Default number of places returned by a search
pub const DEFAULT_MAX_RESULTS: usize = 60;

/// Wait before a freshly issued page token is accepted upstream
pub const DEFAULT_PAGE_TOKEN_DELAY_MS: u64 = 2000;

/// Timeout for provider HTTP calls in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Transport deadline for model calls in seconds
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8000;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "plate-finder";
