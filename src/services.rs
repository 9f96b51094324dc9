//! Service wiring
//!
//! Builds the concrete clients from configuration once so the CLI and the
//! HTTP server share the same construction.

use crate::analysis::{AnalysisEngine, OpenAiClient};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::location::google::GoogleGeocoder;
use crate::location::ip_location::IpApiLocator;
use crate::location::LocationResolver;
use crate::places::client::GooglePlacesClient;
use crate::places::search::PlaceFinder;
use tracing::warn;

pub type Finder = PlaceFinder<GooglePlacesClient>;
pub type Resolver = LocationResolver<GoogleGeocoder, IpApiLocator>;
pub type Engine = AnalysisEngine<OpenAiClient>;

/// Everything a request handler needs
#[derive(Debug, Clone)]
pub struct Services {
    finder: Option<Finder>,
    pub resolver: Resolver,
    pub analysis: Engine,
}

impl Services {
    pub fn from_config(config: &Config) -> Result<Self> {
        let timeout = config.search.http_timeout();
        let google_key = config.api_keys.google_key();

        let finder = match google_key {
            Some(key) => {
                let client = GooglePlacesClient::with_base_url(key, &config.endpoints.places, timeout)?;
                Some(PlaceFinder::from_config(client, &config.search))
            }
            None => {
                warn!("Google Places API key not set; search and details are unavailable");
                None
            }
        };

        let geocoder = GoogleGeocoder::with_base_url(
            google_key.map(str::to_string),
            &config.endpoints.geocode,
            timeout,
        )?;
        let ip_locator = IpApiLocator::with_base_url(&config.endpoints.ip_location, timeout)?;

        let model = match config.api_keys.openai_key() {
            Some(key) => Some(OpenAiClient::with_base_url(
                key,
                &config.ai.model,
                &config.endpoints.openai,
                config.ai.timeout(),
            )?),
            None => {
                warn!("OpenAI API key not set; analyses use the rule-based fallback");
                None
            }
        };

        Ok(Self {
            finder,
            resolver: LocationResolver::new(geocoder, ip_locator),
            analysis: AnalysisEngine::new(model),
        })
    }

    /// Place search, or `MissingApiKey` when no Google key is configured
    pub fn finder(&self) -> Result<&Finder> {
        self.finder.as_ref().ok_or(Error::MissingApiKey("Google Places"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_services_without_keys() {
        let mut config = Config::default();
        config.api_keys.google.clear();
        config.api_keys.openai.clear();

        let services = Services::from_config(&config).unwrap();
        assert!(matches!(services.finder(), Err(Error::MissingApiKey("Google Places"))));
        assert!(!services.analysis.has_model());
    }

    #[test]
    fn test_services_with_keys() {
        let mut config = Config::default();
        config.api_keys.google = "g-key".to_string();
        config.api_keys.openai = "o-key".to_string();

        let services = Services::from_config(&config).unwrap();
        assert!(services.finder().is_ok());
        assert!(services.analysis.has_model());
    }
}
