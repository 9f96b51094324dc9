//! Repair of model-produced analysis objects
//!
//! [`validate_analysis`] is total: any JSON object, including an empty one,
//! yields a complete [`AnalysisResult`].

use crate::analysis::{AnalysisResult, CategoryAssessment, OverallRating, NOT_AVAILABLE};
use serde_json::{Map, Value};

pub const MAX_KEY_HIGHLIGHTS: usize = 5;
pub const MAX_POTENTIAL_CONCERNS: usize = 3;
pub const DEFAULT_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_SCORE: &str = "5";

/// Build a result from a parsed object, substituting defaults field by field
pub fn validate_analysis(raw: &Map<String, Value>) -> AnalysisResult {
    AnalysisResult {
        overall_rating: raw
            .get("overall_rating")
            .and_then(Value::as_str)
            .map_or(OverallRating::NotAvailable, OverallRating::from_label),
        overall_summary: text(raw, "overall_summary"),
        food_quality: category(raw.get("food_quality"), false),
        service_quality: category(raw.get("service_quality"), false),
        atmosphere: category(raw.get("atmosphere"), false),
        value_for_money: category(raw.get("value_for_money"), true),
        key_highlights: text_list(raw, "key_highlights", MAX_KEY_HIGHLIGHTS),
        potential_concerns: text_list(raw, "potential_concerns", MAX_POTENTIAL_CONCERNS),
        recommendation: text(raw, "recommendation"),
        best_for: text_list(raw, "best_for", usize::MAX),
        price_range_assessment: text(raw, "price_range_assessment"),
        confidence_score: confidence(raw.get("confidence_score")),
    }
}

fn text(raw: &Map<String, Value>, key: &str) -> String {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

fn text_list(raw: &Map<String, Value>, key: &str, limit: usize) -> Vec<String> {
    raw.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .take(limit)
                .collect()
        })
        .unwrap_or_default()
}

fn category(value: Option<&Value>, is_value_block: bool) -> CategoryAssessment {
    let Some(block) = value.and_then(Value::as_object) else {
        return CategoryAssessment::not_analyzed();
    };

    let field = |key: &str| -> Option<String> {
        block.get(key).and_then(Value::as_str).map(str::to_string)
    };
    let score = score(block.get("score"));

    if is_value_block {
        CategoryAssessment {
            score,
            highlights: field("highlights"),
            concerns: field("concerns"),
            assessment: Some(field("assessment").unwrap_or_else(|| NOT_AVAILABLE.to_string())),
        }
    } else {
        CategoryAssessment {
            score,
            highlights: Some(field("highlights").unwrap_or_else(|| NOT_AVAILABLE.to_string())),
            concerns: Some(field("concerns").unwrap_or_else(|| NOT_AVAILABLE.to_string())),
            assessment: field("assessment"),
        }
    }
}

/// Scores are carried as strings; numbers are rounded into 0-10
pub fn score(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .filter(|n| n.is_finite())
            .map_or_else(
                || DEFAULT_SCORE.to_string(),
                |n| (n.round().clamp(0.0, 10.0) as u8).to_string(),
            ),
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => DEFAULT_SCORE.to_string(),
    }
}

/// Coerce to a float in [0, 1]; non-numeric input gives the default
pub fn confidence(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|c| !c.is_nan())
        .map_or(DEFAULT_CONFIDENCE, |c| c.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_empty_object_is_complete() {
        let result = validate_analysis(&Map::new());
        assert_eq!(result.overall_rating, OverallRating::NotAvailable);
        assert_eq!(result.overall_summary, NOT_AVAILABLE);
        assert_eq!(result.food_quality, CategoryAssessment::not_analyzed());
        assert_eq!(result.value_for_money, CategoryAssessment::not_analyzed());
        assert!(result.key_highlights.is_empty());
        assert!(result.best_for.is_empty());
        assert_eq!(result.recommendation, NOT_AVAILABLE);
        assert_eq!(result.confidence_score, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_well_formed_object_passes_through() {
        let raw = object(json!({
            "overall_rating": "Very Good",
            "overall_summary": "Solid neighborhood spot.",
            "food_quality": {"score": "8", "highlights": "Fresh pasta", "concerns": "Small portions"},
            "service_quality": {"score": 7, "highlights": "Friendly", "concerns": "Slow at peak"},
            "atmosphere": {"score": "6", "highlights": "Cozy", "concerns": "Loud"},
            "value_for_money": {"score": "7", "assessment": "Fair for the quality"},
            "key_highlights": ["Pasta", "Wine list"],
            "potential_concerns": ["Noise"],
            "recommendation": "Date night",
            "best_for": ["Date night"],
            "price_range_assessment": "Fair",
            "confidence_score": 0.8
        }));

        let result = validate_analysis(&raw);
        assert_eq!(result.overall_rating, OverallRating::VeryGood);
        assert_eq!(result.food_quality.highlights.as_deref(), Some("Fresh pasta"));
        assert_eq!(result.service_quality.score, "7");
        assert_eq!(result.value_for_money.assessment.as_deref(), Some("Fair for the quality"));
        assert_eq!(result.value_for_money.highlights, None);
        assert_eq!(result.key_highlights, vec!["Pasta", "Wine list"]);
        assert_eq!(result.confidence_score, 0.8);
    }

    #[test]
    fn test_string_confidence_is_clamped() {
        let raw = object(json!({"confidence_score": "1.7"}));
        assert_eq!(validate_analysis(&raw).confidence_score, 1.0);

        assert_eq!(confidence(Some(&json!(-0.2))), 0.0);
        assert_eq!(confidence(Some(&json!("0.25"))), 0.25);
        assert_eq!(confidence(Some(&json!("high"))), DEFAULT_CONFIDENCE);
        assert_eq!(confidence(Some(&json!(null))), DEFAULT_CONFIDENCE);
        assert_eq!(confidence(Some(&json!([0.9]))), DEFAULT_CONFIDENCE);
    }

    #[test]
    fn test_wrong_shapes_get_defaults() {
        let raw = object(json!({
            "overall_rating": 5,
            "overall_summary": ["not", "a", "string"],
            "food_quality": "great",
            "service_quality": {"score": null},
            "key_highlights": "one big string",
            "best_for": ["Families", 3, null, "Groups"]
        }));

        let result = validate_analysis(&raw);
        assert_eq!(result.overall_rating, OverallRating::NotAvailable);
        assert_eq!(result.overall_summary, NOT_AVAILABLE);
        assert_eq!(result.food_quality, CategoryAssessment::not_analyzed());
        assert_eq!(result.service_quality.score, DEFAULT_SCORE);
        assert_eq!(result.service_quality.highlights.as_deref(), Some(NOT_AVAILABLE));
        assert!(result.key_highlights.is_empty());
        assert_eq!(result.best_for, vec!["Families", "Groups"]);
    }

    #[test]
    fn test_lists_are_truncated() {
        let raw = object(json!({
            "key_highlights": ["a", "b", "c", "d", "e", "f", "g"],
            "potential_concerns": ["w", "x", "y", "z"]
        }));

        let result = validate_analysis(&raw);
        assert_eq!(result.key_highlights.len(), MAX_KEY_HIGHLIGHTS);
        assert_eq!(result.potential_concerns, vec!["w", "x", "y"]);
    }

    #[test]
    fn test_numeric_scores() {
        assert_eq!(score(Some(&json!(8.6))), "9");
        assert_eq!(score(Some(&json!(14))), "10");
        assert_eq!(score(Some(&json!(-3))), "0");
        assert_eq!(score(Some(&json!(" 6 "))), "6");
        assert_eq!(score(Some(&json!(""))), DEFAULT_SCORE);
        assert_eq!(score(None), DEFAULT_SCORE);
    }
}
