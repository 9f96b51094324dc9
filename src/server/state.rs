//! Server shared state

use crate::config::Config;
use crate::error::Result;
use crate::services::Services;

/// Shared state for the HTTP server
pub struct AppState {
    pub config: Config,
    pub services: Services,
}

impl AppState {
    /// Build clients from the configuration
    pub fn new(config: Config) -> Result<Self> {
        let services = Services::from_config(&config)?;
        Ok(Self { config, services })
    }

    /// Radius applied when a search request names none
    pub fn default_radius(&self) -> f64 {
        self.config.search.default_radius_miles
    }

    pub fn max_radius(&self) -> f64 {
        self.config.search.max_radius_miles
    }
}
