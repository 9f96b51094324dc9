//! Human-readable text output formatter

use crate::error::Result;
use crate::format::{OutputFormatter, SearchReport};
use std::fmt::Write;

/// One line per restaurant, nearest first
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, report: &SearchReport) -> Result<String> {
        let mut output = String::new();

        let _ = writeln!(
            output,
            "{} restaurants within {} miles of ({:.6}, {:.6})\n",
            report.total_found,
            report.radius_miles,
            report.search_location.lat,
            report.search_location.lng
        );

        for (i, place) in report.restaurants.iter().enumerate() {
            let rating = place
                .rating
                .map_or_else(|| "-".to_string(), |r| format!("{:.1}", r));
            let price = place
                .price_level
                .map(|p| "$".repeat(usize::from(p)))
                .unwrap_or_default();
            let _ = writeln!(
                output,
                "{:>3}. {} [{}★ {}] {:.2} mi\n     {}",
                i + 1,
                place.name,
                rating,
                price,
                place.distance_miles,
                place.address
            );
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::sample_report;

    #[test]
    fn test_text_format() {
        let output = TextFormatter.format(&sample_report()).unwrap();

        assert!(output.starts_with("1 restaurants within 5 miles of (40.712800, -74.006000)"));
        assert!(output.contains("  1. Joe's Pizza [4.5★ $]"));
        assert!(output.contains("7 Carmine St"));
    }

    #[test]
    fn test_empty_report() {
        let report = SearchReport::new(crate::geo::Coordinates::new(0.0, 0.0), 1.0, Vec::new());
        let output = TextFormatter.format(&report).unwrap();
        assert!(output.starts_with("0 restaurants"));
    }
}
