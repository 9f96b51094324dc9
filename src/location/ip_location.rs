//! IP-based geolocation
//!
//! Uses ipapi.co. With no IP given the service geolocates the caller's own
//! public address. An `"error": true` body is a soft failure, not an error.

use crate::constants::api::IP_API_URL;
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use crate::location::{IpLocator, LocationResult, LocationSource};
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

/// IP location service
#[derive(Debug, Clone)]
pub struct IpApiLocator {
    client: reqwest::Client,
    base_url: String,
}

/// ipapi.co response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    #[serde(default)]
    error: bool,
    reason: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: Option<String>,
    region: Option<String>,
    country_name: Option<String>,
    postal: Option<String>,
}

impl IpApiLocator {
    /// Create a locator for the production service
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(IP_API_URL, timeout)
    }

    /// Create a locator with a custom base URL
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn lookup_url(&self, ip: Option<&str>) -> String {
        match ip.map(str::trim).filter(|ip| !ip.is_empty()) {
            Some(ip) => format!("{}/{}/json/", self.base_url, urlencoding::encode(ip)),
            None => format!("{}/json/", self.base_url),
        }
    }

    fn into_location(data: IpApiResponse) -> Option<LocationResult> {
        if data.error {
            warn!(reason = data.reason.as_deref().unwrap_or("unknown"), "IP geolocation error");
            return None;
        }

        let (Some(lat), Some(lng)) = (data.latitude, data.longitude) else {
            warn!("IP geolocation response had no coordinates");
            return None;
        };
        let coords = Coordinates::new(lat, lng);
        if coords.validate().is_err() {
            warn!(%coords, "IP geolocation returned out-of-range coordinates");
            return None;
        }

        Some(LocationResult {
            city: data.city,
            state: data.region,
            country: data.country_name,
            zip_code: data.postal,
            ..LocationResult::at(coords, LocationSource::Ip)
        })
    }
}

impl IpLocator for IpApiLocator {
    async fn locate(&self, ip: Option<&str>) -> Result<Option<LocationResult>> {
        let response = self
            .client
            .get(self.lookup_url(ip))
            .send()
            .await
            .map_err(|e| Error::Location(format!("IP location request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Location(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Location(format!("Failed to parse IP location response: {}", e)))?;

        Ok(Self::into_location(data))
    }
}
