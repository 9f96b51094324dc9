//! Output formatters
//!
//! Renders search results for the command line.

pub mod json;
pub mod text;

use crate::error::Result;
use crate::geo::Coordinates;
use crate::places::PlaceSummary;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    pub name: String,
    pub description: String,
}

/// One finished search, as handed to a formatter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    pub search_location: Coordinates,
    pub radius_miles: f64,
    pub total_found: usize,
    pub restaurants: Vec<PlaceSummary>,
}

impl SearchReport {
    pub fn new(search_location: Coordinates, radius_miles: f64, restaurants: Vec<PlaceSummary>) -> Self {
        Self {
            search_location,
            radius_miles,
            total_found: restaurants.len(),
            restaurants,
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn format(&self, report: &SearchReport) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    [
        &json::JsonFormatter as &dyn OutputFormatter,
        &text::TextFormatter,
    ]
    .iter()
    .map(|f| FormatInfo {
        name: f.name().to_string(),
        description: f.description().to_string(),
    })
    .collect()
}

#[cfg(test)]
pub(crate) fn sample_report() -> SearchReport {
    use serde_json::json;

    let origin = Coordinates::new(40.7128, -74.006);
    let raw = json!({
        "place_id": "p1",
        "name": "Joe's Pizza",
        "vicinity": "7 Carmine St",
        "geometry": {"location": {"lat": 40.7306, "lng": -74.0021}},
        "rating": 4.5,
        "user_ratings_total": 1200,
        "price_level": 1,
        "types": ["restaurant", "food"]
    });
    SearchReport::new(origin, 5.0, vec![PlaceSummary::from_raw(&raw, origin)])
}
