//! Google Geocoding backend
//!
//! Forward and reverse geocoding via `/geocode/json`. Address components are
//! picked out by their `types` keyword, never by position in the list.

use crate::constants::api::{GOOGLE_GEOCODE_URL, STATUS_OK};
use crate::error::{Error, Result};
use crate::geo::Coordinates;
use crate::location::{Geocoder, LocationResult, LocationSource, ReverseGeocode};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

/// Google geocoding backend
///
/// Without an API key every lookup answers `Ok(None)`.
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

/// City/state/country/postal code picked from `address_components`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressParts {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
}

impl AddressParts {
    pub fn from_components(components: &[Value]) -> Self {
        let mut parts = Self::default();

        for component in components {
            let types: Vec<&str> = component
                .get("types")
                .and_then(Value::as_array)
                .map(|t| t.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            let name = |key: &str| component.get(key).and_then(Value::as_str).map(str::to_string);

            if types.contains(&"locality") {
                parts.city = name("long_name");
            } else if types.contains(&"administrative_area_level_1") {
                parts.state = name("short_name");
            } else if types.contains(&"country") {
                parts.country = name("long_name");
            } else if types.contains(&"postal_code") {
                parts.zip_code = name("long_name");
            }
        }

        parts
    }
}

impl GoogleGeocoder {
    /// Create a geocoder for the production API
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self> {
        Self::with_base_url(api_key, GOOGLE_GEOCODE_URL, timeout)
    }

    /// Create a geocoder with a custom base URL
    pub fn with_base_url(api_key: Option<String>, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// First result of a geocode query, or `None` on a non-OK status
    async fn first_result(&self, key: &str, params: &[(&str, String)]) -> Result<Option<Value>> {
        let response = self
            .client
            .get(format!("{}/json", self.base_url))
            .query(params)
            .query(&[("key", key)])
            .send()
            .await
            .map_err(|e| Error::Location(format!("Geocoding request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Location(format!(
                "Geocoding API returned status: {}",
                response.status()
            )));
        }

        let mut body: Value = response
            .json()
            .await
            .map_err(|e| Error::Location(format!("Failed to parse geocoding response: {}", e)))?;

        let status = body.get("status").and_then(Value::as_str).unwrap_or("");
        if status != STATUS_OK {
            warn!(status, "geocoding error");
            return Ok(None);
        }

        Ok(body
            .get_mut("results")
            .and_then(Value::as_array_mut)
            .filter(|r| !r.is_empty())
            .map(|r| r.swap_remove(0)))
    }
}

impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<LocationResult>> {
        let Some(key) = self.api_key.as_deref() else {
            warn!("Google API key not configured for geocoding");
            return Ok(None);
        };

        let Some(result) = self
            .first_result(key, &[("address", address.to_string())])
            .await?
        else {
            return Ok(None);
        };

        let location = result.get("geometry").and_then(|g| g.get("location"));
        let coord = |k: &str| location.and_then(|l| l.get(k)).and_then(Value::as_f64);
        let (Some(lat), Some(lng)) = (coord("lat"), coord("lng")) else {
            warn!(address, "geocoding result had no coordinates");
            return Ok(None);
        };

        let components = result
            .get("address_components")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let parts = AddressParts::from_components(components);

        Ok(Some(LocationResult {
            city: parts.city,
            state: parts.state,
            country: parts.country,
            zip_code: parts.zip_code,
            ..LocationResult::at(Coordinates::new(lat, lng), LocationSource::GeocodedAddress)
        }))
    }

    async fn reverse_geocode(&self, coords: Coordinates) -> Result<Option<ReverseGeocode>> {
        let Some(key) = self.api_key.as_deref() else {
            return Ok(None);
        };

        let Some(result) = self.first_result(key, &[("latlng", coords.to_string())]).await? else {
            return Ok(None);
        };

        let text = |k: &str| {
            result
                .get(k)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let components = result
            .get("address_components")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        Ok(Some(ReverseGeocode {
            formatted_address: text("formatted_address"),
            place_id: text("place_id"),
            city: AddressParts::from_components(components).city,
        }))
    }
}
