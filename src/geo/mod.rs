//! Geographic primitives
//!
//! Coordinate type with range validation and great-circle distance in miles.

pub mod distance;

pub use distance::{distance_miles, miles_to_meters, round_to};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    /// Validated constructor
    pub fn checked(lat: f64, lng: f64) -> Result<Self> {
        let coords = Self::new(lat, lng);
        coords.validate()?;
        Ok(coords)
    }

    /// Copy with both components pulled into range
    ///
    /// NaN components become 0.
    pub fn clamped(&self) -> Self {
        let clamp = |v: f64, bound: f64| if v.is_nan() { 0.0 } else { v.clamp(-bound, bound) };
        Self::new(clamp(self.lat, 90.0), clamp(self.lng, 180.0))
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_bounds() {
        assert!(Coordinates::new(90.0, 180.0).validate().is_ok());
        assert!(Coordinates::new(-90.0, -180.0).validate().is_ok());
        assert!(Coordinates::new(0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(matches!(
            Coordinates::new(90.5, 0.0).validate(),
            Err(Error::InvalidCoordinates(_))
        ));
        assert!(Coordinates::new(0.0, -180.1).validate().is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).validate().is_err());
    }

    #[test]
    fn test_clamped() {
        let c = Coordinates::new(95.0, -200.0).clamped();
        assert_eq!(c, Coordinates::new(90.0, -180.0));

        let c = Coordinates::new(f64::NAN, 10.0).clamped();
        assert_eq!(c, Coordinates::new(0.0, 10.0));
    }

    #[test]
    fn test_display_is_provider_location_param() {
        let c = Coordinates::new(40.7128, -74.006);
        assert_eq!(c.to_string(), "40.7128,-74.006");
    }
}
