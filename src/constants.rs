//! Centralized constants for the plate-finder crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in miles
    pub const EARTH_RADIUS_MILES: f64 = 3959.0;

    /// Meters per statute mile, as used when building search requests
    pub const METERS_PER_MILE: f64 = 1609.34;
}

/// Search bounds
pub mod search {
    /// Smallest radius a caller may request, in miles
    pub const MIN_RADIUS_MILES: f64 = 0.1;

    /// Largest number of places one search may return (three provider pages)
    pub const MAX_RESULTS_LIMIT: usize = 60;

    /// Place category passed to the nearby-search endpoint
    pub const PLACE_TYPE: &str = "restaurant";

    /// Photo references kept per place
    pub const MAX_PHOTOS: usize = 3;

    /// Places fed into an area summary when called from the HTTP API
    pub const AREA_ANALYSIS_MAX_PLACES: usize = 20;

    /// Radius of an area summary when the caller names none, in miles
    pub const AREA_DEFAULT_RADIUS_MILES: f64 = 5.0;

    /// Reviews returned per source unless the caller asks otherwise
    pub const DEFAULT_REVIEW_LIMIT: usize = 10;

    /// Upper bound on reviews per source
    pub const MAX_REVIEW_LIMIT: usize = 20;
}

/// External API endpoints
pub mod api {
    /// Google Places web service root
    pub const GOOGLE_PLACES_URL: &str = "https://maps.googleapis.com/maps/api/place";

    /// Google Geocoding web service root
    pub const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode";

    /// IP geolocation API (free tier, no key required)
    pub const IP_API_URL: &str = "http://ipapi.co";

    /// OpenAI-compatible chat completion root
    pub const OPENAI_URL: &str = "https://api.openai.com/v1";

    /// Status sentinel used by the Google web services
    pub const STATUS_OK: &str = "OK";

    /// Status returned by Google when a query matched nothing
    pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";
}

/// Environment variables consulted when config keys are empty
pub mod env {
    pub const GOOGLE_API_KEY: &str = "GOOGLE_PLACES_API_KEY";
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
}
