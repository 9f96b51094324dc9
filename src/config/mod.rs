//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/plate-finder/config.toml
//!
//! API keys left empty in the file are filled from `GOOGLE_PLACES_API_KEY`
//! and `OPENAI_API_KEY` when the config is loaded.

pub mod defaults;

use crate::constants::{api, env as env_keys};
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search defaults and bounds
    #[serde(default)]
    pub search: SearchConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Language model settings
    #[serde(default)]
    pub ai: AiConfig,

    /// API keys for various services
    #[serde(default)]
    pub api_keys: ApiKeysConfig,

    /// Base URLs of the external services
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

/// Search defaults and bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Radius used when a caller does not give one, in miles
    #[serde(default = "default_radius")]
    pub default_radius_miles: f64,

    /// Largest radius accepted, in miles
    #[serde(default = "default_max_radius")]
    pub max_radius_miles: f64,

    /// Result cap used when a caller does not give one
    #[serde(default = "default_max_results")]
    pub default_max_results: usize,

    /// Wait between paged requests, in milliseconds
    #[serde(default = "default_page_token_delay")]
    pub page_token_delay_ms: u64,

    /// Timeout for provider HTTP calls, in seconds
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Language model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Chat model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Transport deadline for a single model call, in seconds
    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,
}

/// API keys for external services
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiKeysConfig {
    /// Google Places / Geocoding key
    #[serde(default)]
    pub google: String,

    /// OpenAI key
    #[serde(default)]
    pub openai: String,
}

/// Base URLs of the external services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_places_url")]
    pub places: String,

    #[serde(default = "default_geocode_url")]
    pub geocode: String,

    #[serde(default = "default_ip_url")]
    pub ip_location: String,

    #[serde(default = "default_openai_url")]
    pub openai: String,
}

// Default value functions for serde
fn default_radius() -> f64 {
    DEFAULT_RADIUS_MILES
}
fn default_max_radius() -> f64 {
    DEFAULT_MAX_RADIUS_MILES
}
fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}
fn default_page_token_delay() -> u64 {
    DEFAULT_PAGE_TOKEN_DELAY_MS
}
fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_model_timeout() -> u64 {
    DEFAULT_MODEL_TIMEOUT_SECS
}
fn default_places_url() -> String {
    api::GOOGLE_PLACES_URL.to_string()
}
fn default_geocode_url() -> String {
    api::GOOGLE_GEOCODE_URL.to_string()
}
fn default_ip_url() -> String {
    api::IP_API_URL.to_string()
}
fn default_openai_url() -> String {
    api::OPENAI_URL.to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_radius_miles: default_radius(),
            max_radius_miles: default_max_radius(),
            default_max_results: default_max_results(),
            page_token_delay_ms: default_page_token_delay(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            timeout_secs: default_model_timeout(),
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            places: default_places_url(),
            geocode: default_geocode_url(),
            ip_location: default_ip_url(),
            openai: default_openai_url(),
        }
    }
}

impl ApiKeysConfig {
    /// Google key, if one is configured
    pub fn google_key(&self) -> Option<&str> {
        non_empty(&self.google)
    }

    /// OpenAI key, if one is configured
    pub fn openai_key(&self) -> Option<&str> {
        non_empty(&self.openai)
    }

    /// Fill empty keys from the process environment
    pub fn apply_env(&mut self) {
        if self.google.is_empty() {
            if let Ok(key) = std::env::var(env_keys::GOOGLE_API_KEY) {
                self.google = key;
            }
        }
        if self.openai.is_empty() {
            if let Ok(key) = std::env::var(env_keys::OPENAI_API_KEY) {
                self.openai = key;
            }
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

impl SearchConfig {
    pub fn page_token_delay(&self) -> Duration {
        Duration::from_millis(self.page_token_delay_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path, then apply env overrides
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.api_keys.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific file, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["search", "default_radius_miles"] => Some(self.search.default_radius_miles.to_string()),
            ["search", "max_radius_miles"] => Some(self.search.max_radius_miles.to_string()),
            ["search", "default_max_results"] => Some(self.search.default_max_results.to_string()),
            ["search", "page_token_delay_ms"] => Some(self.search.page_token_delay_ms.to_string()),
            ["search", "http_timeout_secs"] => Some(self.search.http_timeout_secs.to_string()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            ["ai", "model"] => Some(self.ai.model.clone()),
            ["ai", "timeout_secs"] => Some(self.ai.timeout_secs.to_string()),

            ["api_keys", "google"] => Some(self.api_keys.google.clone()),
            ["api_keys", "openai"] => Some(self.api_keys.openai.clone()),

            ["endpoints", "places"] => Some(self.endpoints.places.clone()),
            ["endpoints", "geocode"] => Some(self.endpoints.geocode.clone()),
            ["endpoints", "ip_location"] => Some(self.endpoints.ip_location.clone()),
            ["endpoints", "openai"] => Some(self.endpoints.openai.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["search", "default_radius_miles"] => {
                self.search.default_radius_miles = parse_value(key, value)?;
            }
            ["search", "max_radius_miles"] => {
                self.search.max_radius_miles = parse_value(key, value)?;
            }
            ["search", "default_max_results"] => {
                self.search.default_max_results = parse_value(key, value)?;
            }
            ["search", "page_token_delay_ms"] => {
                self.search.page_token_delay_ms = parse_value(key, value)?;
            }
            ["search", "http_timeout_secs"] => {
                self.search.http_timeout_secs = parse_value(key, value)?;
            }

            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => self.server.port = parse_value(key, value)?,

            ["ai", "model"] => self.ai.model = value.to_string(),
            ["ai", "timeout_secs"] => self.ai.timeout_secs = parse_value(key, value)?,

            ["api_keys", "google"] => self.api_keys.google = value.to_string(),
            ["api_keys", "openai"] => self.api_keys.openai = value.to_string(),

            ["endpoints", "places"] => self.endpoints.places = value.to_string(),
            ["endpoints", "geocode"] => self.endpoints.geocode = value.to_string(),
            ["endpoints", "ip_location"] => self.endpoints.ip_location = value.to_string(),
            ["endpoints", "openai"] => self.endpoints.openai = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "search.default_radius_miles",
            "search.max_radius_miles",
            "search.default_max_results",
            "search.page_token_delay_ms",
            "search.http_timeout_secs",
            "server.host",
            "server.port",
            "ai.model",
            "ai.timeout_secs",
            "api_keys.google",
            "api_keys.openai",
            "endpoints.places",
            "endpoints.geocode",
            "endpoints.ip_location",
            "endpoints.openai",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.search.default_radius_miles, 10.0);
        assert_eq!(config.search.max_radius_miles, 10.0);
        assert_eq!(config.search.default_max_results, 60);
        assert_eq!(config.search.page_token_delay(), Duration::from_secs(2));
        assert_eq!(config.ai.model, "gpt-4o-mini");
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        assert_eq!(config.get("ai.model"), Some("gpt-4o-mini".to_string()));

        config.set("ai.model", "gpt-4o").unwrap();
        assert_eq!(config.get("ai.model"), Some("gpt-4o".to_string()));

        config.set("search.max_radius_miles", "5").unwrap();
        assert_eq!(config.search.max_radius_miles, 5.0);
    }

    #[test]
    fn test_every_available_key_is_readable() {
        let config = Config::default();
        for key in Config::available_keys() {
            assert!(config.get(key).is_some(), "missing getter for {}", key);
        }
    }

    #[test]
    fn test_set_invalid_key() {
        let mut config = Config::default();
        assert!(config.set("invalid.key", "value").is_err());
    }

    #[test]
    fn test_set_invalid_value() {
        let mut config = Config::default();
        assert!(config.set("search.default_max_results", "lots").is_err());
    }

    #[test]
    fn test_api_key_accessors_ignore_blank() {
        let mut keys = ApiKeysConfig::default();
        assert!(keys.google_key().is_none());

        keys.google = "   ".to_string();
        assert!(keys.google_key().is_none());

        keys.openai = "sk-test".to_string();
        assert_eq!(keys.openai_key(), Some("sk-test"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = Config::default();
        config.search.max_radius_miles = 3.5;
        config.api_keys.google = "g-key".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.search.max_radius_miles, 3.5);
        assert_eq!(loaded.api_keys.google, "g-key");
    }

    #[test]
    fn test_load_creates_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);

        let loaded = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(loaded.server.port, 8000);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let parsed: Config = toml::from_str("[search]\nmax_radius_miles = 2.0\n").unwrap();
        assert_eq!(parsed.search.max_radius_miles, 2.0);
        assert_eq!(parsed.search.default_max_results, 60);
        assert_eq!(parsed.endpoints.places, api::GOOGLE_PLACES_URL);
    }

    #[test]
    fn test_serialization_format() {
        let toml = toml::to_string_pretty(&Config::default()).unwrap();

        assert!(toml.contains("[search]"));
        assert!(toml.contains("[server]"));
        assert!(toml.contains("[api_keys]"));
        assert!(toml.contains("[endpoints]"));
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "127.0.0.1:8000");
    }
}
