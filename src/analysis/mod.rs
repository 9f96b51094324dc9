//! Restaurant analysis
//!
//! A single-restaurant analysis goes through prompt building, one model
//! call, parsing, and validation. When there is no model, the call fails,
//! or the output cannot be parsed into an object, a deterministic rule-based
//! analysis is returned instead. Both paths produce the same
//! [`AnalysisResult`] shape.
//!
//! Area analysis summarizes a list of places as free text.

pub mod engine;
pub mod fallback;
pub mod llm;
pub mod parse;
pub mod prompt;
pub mod validate;

pub use engine::AnalysisEngine;
pub use fallback::create_fallback_analysis;
pub use llm::{CompletionRequest, LanguageModel, OpenAiClient};

use crate::places::{PlaceDetail, PlaceSummary};
use crate::reviews::ReviewRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder used for any text field the model left out
pub const NOT_AVAILABLE: &str = "Not available";

/// Overall verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallRating {
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    Good,
    Fair,
    Poor,
    /// Substituted when the model's verdict is missing or unrecognized
    #[serde(rename = "Not available")]
    NotAvailable,
}

impl OverallRating {
    /// Verdict for a numeric star rating
    pub fn from_stars(rating: f64) -> Self {
        if rating >= 4.5 {
            Self::Excellent
        } else if rating >= 4.0 {
            Self::VeryGood
        } else if rating >= 3.5 {
            Self::Good
        } else if rating >= 3.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    /// Lenient parse of a model-supplied label
    pub fn from_label(label: &str) -> Self {
        let normalized: String = label
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphabetic())
            .collect();
        match normalized.as_str() {
            "excellent" => Self::Excellent,
            "verygood" => Self::VeryGood,
            "good" => Self::Good,
            "fair" => Self::Fair,
            "poor" => Self::Poor,
            _ => Self::NotAvailable,
        }
    }
}

impl std::fmt::Display for OverallRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::NotAvailable => NOT_AVAILABLE,
        };
        f.write_str(label)
    }
}

/// One scored category (food, service, atmosphere, value)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAssessment {
    /// Whole number 1-10, as a string
    pub score: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concerns: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<String>,
}

impl CategoryAssessment {
    pub fn new(score: impl Into<String>, highlights: &str, concerns: &str) -> Self {
        Self {
            score: score.into(),
            highlights: Some(highlights.to_string()),
            concerns: Some(concerns.to_string()),
            assessment: None,
        }
    }

    pub fn value(score: impl Into<String>, assessment: String) -> Self {
        Self {
            score: score.into(),
            highlights: None,
            concerns: None,
            assessment: Some(assessment),
        }
    }

    /// Block used when the model omitted or mangled a category
    pub fn not_analyzed() -> Self {
        Self::new("5", "Not analyzed", "No data available")
    }
}

/// Structured analysis of one restaurant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall_rating: OverallRating,
    pub overall_summary: String,
    pub food_quality: CategoryAssessment,
    pub service_quality: CategoryAssessment,
    pub atmosphere: CategoryAssessment,
    pub value_for_money: CategoryAssessment,
    pub key_highlights: Vec<String>,
    pub potential_concerns: Vec<String>,
    pub recommendation: String,
    pub best_for: Vec<String>,
    pub price_range_assessment: String,
    /// 0.0-1.0, reflects how much review data was available
    pub confidence_score: f64,
}

/// Price tier as reported, which may be a number, a numeric string, or text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceLevel {
    #[default]
    Unknown,
    Tier(u8),
    Text(String),
}

impl PriceLevel {
    /// Coerce a loosely typed value
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .map_or(Self::Unknown, Self::Tier),
            Value::String(s) => Self::from_text(s),
            _ => Self::Unknown,
        }
    }

    pub fn from_text(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            Self::Unknown
        } else if let Ok(tier) = s.parse::<u8>() {
            Self::Tier(tier)
        } else {
            Self::Text(s.to_string())
        }
    }
}

impl From<Option<u8>> for PriceLevel {
    fn from(tier: Option<u8>) -> Self {
        tier.map_or(Self::Unknown, Self::Tier)
    }
}

/// Everything the analysis knows about one restaurant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestaurantProfile {
    pub name: Option<String>,
    pub rating: Option<f64>,
    pub total_ratings: Option<u64>,
    #[serde(default)]
    pub price_level: PriceLevel,
    #[serde(default)]
    pub cuisine_types: Vec<String>,
    #[serde(default)]
    pub reviews: Vec<ReviewRecord>,
}

impl From<&PlaceDetail> for RestaurantProfile {
    fn from(detail: &PlaceDetail) -> Self {
        Self {
            name: detail.name.clone(),
            rating: detail.rating,
            total_ratings: detail.total_ratings,
            price_level: detail.price_level.into(),
            cuisine_types: detail.types.clone(),
            reviews: detail.reviews.clone(),
        }
    }
}

/// One line of an area summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaPlace {
    pub name: String,
    pub rating: Option<f64>,
    pub distance_miles: Option<f64>,
    #[serde(default)]
    pub cuisine_types: Vec<String>,
    pub price_level: Option<u8>,
}

impl From<&PlaceSummary> for AreaPlace {
    fn from(place: &PlaceSummary) -> Self {
        Self {
            name: place.name.clone(),
            rating: place.rating,
            distance_miles: Some(place.distance_miles),
            cuisine_types: place.cuisine_types.clone(),
            price_level: place.price_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_overall_rating_thresholds() {
        assert_eq!(OverallRating::from_stars(4.5), OverallRating::Excellent);
        assert_eq!(OverallRating::from_stars(4.49), OverallRating::VeryGood);
        assert_eq!(OverallRating::from_stars(4.0), OverallRating::VeryGood);
        assert_eq!(OverallRating::from_stars(3.5), OverallRating::Good);
        assert_eq!(OverallRating::from_stars(3.0), OverallRating::Fair);
        assert_eq!(OverallRating::from_stars(2.99), OverallRating::Poor);
        assert_eq!(OverallRating::from_stars(0.0), OverallRating::Poor);
    }

    #[test]
    fn test_overall_rating_labels() {
        assert_eq!(OverallRating::from_label("Very Good"), OverallRating::VeryGood);
        assert_eq!(OverallRating::from_label(" very-good "), OverallRating::VeryGood);
        assert_eq!(OverallRating::from_label("EXCELLENT"), OverallRating::Excellent);
        assert_eq!(OverallRating::from_label("superb"), OverallRating::NotAvailable);
    }

    #[test]
    fn test_overall_rating_serializes_as_label() {
        assert_eq!(serde_json::to_value(OverallRating::VeryGood).unwrap(), json!("Very Good"));
        assert_eq!(
            serde_json::to_value(OverallRating::NotAvailable).unwrap(),
            json!("Not available")
        );
    }

    #[test]
    fn test_price_level_coercion() {
        assert_eq!(PriceLevel::from_value(&json!(3)), PriceLevel::Tier(3));
        assert_eq!(PriceLevel::from_value(&json!("2")), PriceLevel::Tier(2));
        assert_eq!(PriceLevel::from_value(&json!("Upscale")), PriceLevel::Text("Upscale".to_string()));
        assert_eq!(PriceLevel::from_value(&json!(null)), PriceLevel::Unknown);
        assert_eq!(PriceLevel::from_value(&json!(-1)), PriceLevel::Unknown);
        assert_eq!(PriceLevel::from(None), PriceLevel::Unknown);
    }

    #[test]
    fn test_value_block_shape() {
        let block = CategoryAssessment::value("7", "Fair".to_string());
        assert_eq!(
            serde_json::to_value(block).unwrap(),
            json!({"score": "7", "assessment": "Fair"})
        );
    }
}
