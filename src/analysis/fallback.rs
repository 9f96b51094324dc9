//! Rule-based analysis used when the model path yields nothing

use crate::analysis::{
    AnalysisResult, CategoryAssessment, OverallRating, PriceLevel, RestaurantProfile,
};

pub const FALLBACK_CONFIDENCE: f64 = 0.3;
const VALUE_SCORE: &str = "7";

/// Short price descriptor used in fallback prose
pub fn price_descriptor(level: &PriceLevel) -> String {
    match level {
        PriceLevel::Tier(1) => "budget-friendly".to_string(),
        PriceLevel::Tier(3) => "upscale".to_string(),
        PriceLevel::Tier(4) => "fine dining".to_string(),
        PriceLevel::Text(text) => text.clone(),
        PriceLevel::Tier(_) | PriceLevel::Unknown => "moderately priced".to_string(),
    }
}

/// Deterministic analysis derived from rating, review count and price tier
pub fn create_fallback_analysis(profile: &RestaurantProfile) -> AnalysisResult {
    let rating = profile.rating.filter(|r| r.is_finite()).unwrap_or(0.0);
    let total = profile.total_ratings.unwrap_or(0);
    let price = price_descriptor(&profile.price_level);
    let category_score = ((rating * 2.0).round().clamp(0.0, 10.0) as u8).to_string();

    AnalysisResult {
        overall_rating: OverallRating::from_stars(rating),
        overall_summary: format!(
            "This {} restaurant has a {}/5 star rating based on {} reviews.",
            price, rating, total
        ),
        food_quality: CategoryAssessment::new(
            category_score.clone(),
            "Based on customer ratings",
            "Limited analysis available",
        ),
        service_quality: CategoryAssessment::new(
            category_score.clone(),
            "Based on overall ratings",
            "No specific service data",
        ),
        atmosphere: CategoryAssessment::new(
            category_score,
            "Customer-rated experience",
            "No detailed atmosphere data",
        ),
        value_for_money: CategoryAssessment::value(
            VALUE_SCORE,
            format!("Appears to offer good value in the {} category", price),
        ),
        key_highlights: vec![
            format!("{}/5 star rating", rating),
            format!("{} customer reviews", total),
            format!("{} pricing", price),
        ],
        potential_concerns: vec!["Limited analysis without detailed reviews".to_string()],
        recommendation: format!("Consider visiting if you enjoy {} dining options", price),
        best_for: vec!["General dining".to_string()],
        price_range_assessment: format!("Pricing appears {} based on Google data", price),
        confidence_score: FALLBACK_CONFIDENCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(rating: Option<f64>, total: Option<u64>, price: PriceLevel) -> RestaurantProfile {
        RestaurantProfile {
            name: Some("Test".to_string()),
            rating,
            total_ratings: total,
            price_level: price,
            ..Default::default()
        }
    }

    #[test]
    fn test_fallback_from_good_rating() {
        let result = create_fallback_analysis(&profile(Some(4.3), Some(150), PriceLevel::Tier(2)));

        assert_eq!(result.overall_rating, OverallRating::VeryGood);
        assert_eq!(
            result.overall_summary,
            "This moderately priced restaurant has a 4.3/5 star rating based on 150 reviews."
        );
        assert_eq!(result.food_quality.score, "9");
        assert_eq!(result.service_quality.score, "9");
        assert_eq!(result.value_for_money.score, "7");
        assert_eq!(result.key_highlights[0], "4.3/5 star rating");
        assert_eq!(result.confidence_score, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn test_fallback_without_data() {
        let result = create_fallback_analysis(&RestaurantProfile::default());

        assert_eq!(result.overall_rating, OverallRating::Poor);
        assert_eq!(result.atmosphere.score, "0");
        assert!(result.overall_summary.contains("0/5 star rating based on 0 reviews"));
        assert_eq!(result.best_for, vec!["General dining"]);
    }

    #[test]
    fn test_price_descriptors() {
        assert_eq!(price_descriptor(&PriceLevel::Tier(1)), "budget-friendly");
        assert_eq!(price_descriptor(&PriceLevel::Tier(4)), "fine dining");
        assert_eq!(price_descriptor(&PriceLevel::Tier(7)), "moderately priced");
        assert_eq!(price_descriptor(&PriceLevel::Unknown), "moderately priced");
        assert_eq!(price_descriptor(&PriceLevel::Text("cheap eats".into())), "cheap eats");

        let result = create_fallback_analysis(&profile(Some(4.8), None, PriceLevel::Tier(4)));
        assert_eq!(result.overall_rating, OverallRating::Excellent);
        assert_eq!(result.recommendation, "Consider visiting if you enjoy fine dining dining options");
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let input = profile(Some(3.6), Some(12), PriceLevel::Tier(3));
        assert_eq!(create_fallback_analysis(&input), create_fallback_analysis(&input));
    }
}
