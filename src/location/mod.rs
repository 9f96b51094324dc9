//! Requester location resolution
//!
//! Tries, in order, explicit coordinates, a geocoded address and IP
//! geolocation. Each step only runs when the previous one is absent or
//! fails; if all fail the caller gets `None` rather than a placeholder.

pub mod google;
pub mod ip_location;

pub use google::GoogleGeocoder;
pub use ip_location::IpApiLocator;

use crate::error::Result;
use crate::geo::Coordinates;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, warn};

/// How a location was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    Ip,
    UserProvided,
    GeocodedAddress,
}

/// A resolved requester location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
    pub source: LocationSource,
}

impl LocationResult {
    /// Bare result at `coords`
    pub fn at(coords: Coordinates, source: LocationSource) -> Self {
        Self {
            latitude: coords.lat,
            longitude: coords.lng,
            accuracy: None,
            city: None,
            state: None,
            country: None,
            zip_code: None,
            source,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Reverse geocoding output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseGeocode {
    pub formatted_address: String,
    pub place_id: String,
    pub city: Option<String>,
}

/// Trait for geocoding backends
///
/// `Ok(None)` means the provider answered but had no usable match.
pub trait Geocoder: Send + Sync {
    /// Geocode an address to a location with its address components
    fn geocode(&self, address: &str) -> impl Future<Output = Result<Option<LocationResult>>> + Send;

    /// Reverse geocode coordinates to an address
    fn reverse_geocode(
        &self,
        coords: Coordinates,
    ) -> impl Future<Output = Result<Option<ReverseGeocode>>> + Send;
}

/// Trait for IP geolocation backends
pub trait IpLocator: Send + Sync {
    /// Locate `ip`, or the caller's public address when `None`
    fn locate(&self, ip: Option<&str>) -> impl Future<Output = Result<Option<LocationResult>>> + Send;
}

/// Resolves a requester's location from whatever the request carries
#[derive(Debug, Clone)]
pub struct LocationResolver<G, I> {
    geocoder: G,
    ip_locator: I,
}

impl<G: Geocoder, I: IpLocator> LocationResolver<G, I> {
    pub fn new(geocoder: G, ip_locator: I) -> Self {
        Self {
            geocoder,
            ip_locator,
        }
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Resolve in precedence order: coordinates, address, IP
    pub async fn resolve(
        &self,
        coords: Option<Coordinates>,
        address: Option<&str>,
        client_ip: Option<&str>,
    ) -> Option<LocationResult> {
        if let Some(coords) = coords {
            match coords.validate() {
                Ok(()) => return Some(self.from_coordinates(coords).await),
                Err(e) => warn!(error = %e, "ignoring explicit coordinates"),
            }
        }

        if let Some(address) = address.map(str::trim).filter(|a| !a.is_empty()) {
            match self.geocoder.geocode(address).await {
                Ok(Some(location)) => return Some(location),
                Ok(None) => debug!(address, "address did not geocode"),
                Err(e) => warn!(address, error = %e, "geocoding failed"),
            }
        }

        match self.ip_locator.locate(client_ip).await {
            Ok(Some(location)) => return Some(location),
            Ok(None) => debug!(?client_ip, "IP geolocation had no result"),
            Err(e) => warn!(?client_ip, error = %e, "IP geolocation failed"),
        }

        warn!("could not determine user location using any method");
        None
    }

    /// Explicit coordinates, with a best-effort city name attached
    async fn from_coordinates(&self, coords: Coordinates) -> LocationResult {
        let city = match self.geocoder.reverse_geocode(coords).await {
            Ok(found) => found.and_then(|r| r.city),
            Err(e) => {
                debug!(error = %e, "reverse geocoding failed");
                None
            }
        };

        LocationResult {
            city,
            ..LocationResult::at(coords, LocationSource::UserProvided)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeGeocoder {
        fail: bool,
        geocode_calls: AtomicUsize,
    }

    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, _address: &str) -> Result<Option<LocationResult>> {
            self.geocode_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::Location("boom".to_string()));
            }
            Ok(Some(LocationResult {
                city: Some("Geotown".to_string()),
                ..LocationResult::at(Coordinates::new(1.0, 2.0), LocationSource::GeocodedAddress)
            }))
        }

        async fn reverse_geocode(&self, _coords: Coordinates) -> Result<Option<ReverseGeocode>> {
            if self.fail {
                return Err(Error::Location("boom".to_string()));
            }
            Ok(Some(ReverseGeocode {
                formatted_address: "1 Main St".to_string(),
                place_id: "rev".to_string(),
                city: Some("Revtown".to_string()),
            }))
        }
    }

    struct FakeIp(Option<LocationResult>);

    impl IpLocator for FakeIp {
        async fn locate(&self, _ip: Option<&str>) -> Result<Option<LocationResult>> {
            Ok(self.0.clone())
        }
    }

    fn ip_location() -> LocationResult {
        LocationResult::at(Coordinates::new(3.0, 4.0), LocationSource::Ip)
    }

    #[tokio::test]
    async fn test_coordinates_win_over_address() {
        let resolver = LocationResolver::new(FakeGeocoder::default(), FakeIp(Some(ip_location())));
        let location = resolver
            .resolve(Some(Coordinates::new(10.0, 20.0)), Some("somewhere"), None)
            .await
            .unwrap();

        assert_eq!(location.source, LocationSource::UserProvided);
        assert_eq!(location.coordinates(), Coordinates::new(10.0, 20.0));
        assert_eq!(location.city.as_deref(), Some("Revtown"));
        assert_eq!(resolver.geocoder().geocode_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reverse_geocode_failure_keeps_coordinates() {
        let geocoder = FakeGeocoder {
            fail: true,
            ..Default::default()
        };
        let resolver = LocationResolver::new(geocoder, FakeIp(None));
        let location = resolver
            .resolve(Some(Coordinates::new(10.0, 20.0)), None, None)
            .await
            .unwrap();

        assert_eq!(location.source, LocationSource::UserProvided);
        assert!(location.city.is_none());
    }

    #[tokio::test]
    async fn test_invalid_coordinates_fall_through() {
        let resolver = LocationResolver::new(FakeGeocoder::default(), FakeIp(None));
        let location = resolver
            .resolve(Some(Coordinates::new(120.0, 20.0)), Some("somewhere"), None)
            .await
            .unwrap();

        assert_eq!(location.source, LocationSource::GeocodedAddress);
    }

    #[tokio::test]
    async fn test_address_failure_falls_back_to_ip() {
        let geocoder = FakeGeocoder {
            fail: true,
            ..Default::default()
        };
        let resolver = LocationResolver::new(geocoder, FakeIp(Some(ip_location())));
        let location = resolver.resolve(None, Some("nowhere"), None).await.unwrap();

        assert_eq!(location.source, LocationSource::Ip);
    }

    #[tokio::test]
    async fn test_blank_address_skipped() {
        let resolver = LocationResolver::new(FakeGeocoder::default(), FakeIp(Some(ip_location())));
        let location = resolver.resolve(None, Some("   "), None).await.unwrap();

        assert_eq!(location.source, LocationSource::Ip);
        assert_eq!(resolver.geocoder().geocode_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_everything_fails() {
        let geocoder = FakeGeocoder {
            fail: true,
            ..Default::default()
        };
        let resolver = LocationResolver::new(geocoder, FakeIp(None));
        assert!(resolver.resolve(None, Some("nowhere"), None).await.is_none());
    }

    #[test]
    fn test_source_serialization() {
        let json = serde_json::to_string(&LocationSource::GeocodedAddress).unwrap();
        assert_eq!(json, "\"geocoded_address\"");
        let json = serde_json::to_string(&LocationSource::UserProvided).unwrap();
        assert_eq!(json, "\"user_provided\"");
    }
}
