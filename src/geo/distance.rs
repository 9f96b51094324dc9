//! Great-circle distance
//!
//! Haversine on a spherical Earth. Inputs are assumed to be validated.

use crate::constants::geo::{EARTH_RADIUS_MILES, METERS_PER_MILE};
use crate::geo::Coordinates;

/// Distance between two points in miles (Haversine formula)
pub fn distance_miles(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_MILES * c
}

/// Convert a radius in miles to whole meters for the search API
pub fn miles_to_meters(miles: f64) -> u32 {
    (miles * METERS_PER_MILE) as u32
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_distance() {
        let points = [
            Coordinates::new(40.7128, -74.0060),
            Coordinates::new(-33.8688, 151.2093),
            Coordinates::new(90.0, 0.0),
            Coordinates::new(0.0, 180.0),
        ];
        for p in points {
            assert_eq!(distance_miles(p, p), 0.0);
        }
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            (Coordinates::new(40.7128, -74.0060), Coordinates::new(34.0522, -118.2437)),
            (Coordinates::new(-89.9, 10.0), Coordinates::new(89.9, -170.0)),
            (Coordinates::new(0.0, 179.9), Coordinates::new(0.0, -179.9)),
        ];
        for (a, b) in pairs {
            assert_eq!(distance_miles(a, b), distance_miles(b, a));
        }
    }

    #[test]
    fn test_one_degree_latitude() {
        // 2 * PI * 3959 / 360
        let d = distance_miles(Coordinates::new(40.0, -74.0), Coordinates::new(41.0, -74.0));
        assert_relative_eq!(d, 69.09, epsilon = 0.01);
    }

    #[test]
    fn test_nyc_to_la() {
        let nyc = Coordinates::new(40.7128, -74.0060);
        let la = Coordinates::new(34.0522, -118.2437);
        let d = distance_miles(nyc, la);
        assert!((d - 2445.0).abs() < 10.0, "got {}", d);
    }

    #[test]
    fn test_antipodal_is_half_circumference() {
        let d = distance_miles(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 180.0));
        assert_relative_eq!(d, std::f64::consts::PI * EARTH_RADIUS_MILES, epsilon = 1e-6);
    }

    #[test]
    fn test_miles_to_meters_truncates() {
        assert_eq!(miles_to_meters(10.0), 16093);
        assert_eq!(miles_to_meters(0.1), 160);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(2.005, 1), 2.0);
        assert_eq!(round_to(0.0, 2), 0.0);
    }
}
