//! Prompt construction

use crate::analysis::{AreaPlace, PriceLevel, RestaurantProfile};
use crate::reviews::most_recent;
use std::fmt::Write;

/// Reviews included in a single-restaurant prompt
pub const MAX_PROMPT_REVIEWS: usize = 10;

/// Places included in an area prompt
pub const MAX_AREA_PLACES: usize = 10;

pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are a professional restaurant critic who provides detailed, honest, and helpful restaurant analyses. Always respond with valid JSON that matches the exact schema provided.";

pub const AREA_SYSTEM_PROMPT: &str = "You are a local dining expert who provides helpful overviews of restaurant scenes in different areas.";

const RESPONSE_SCHEMA: &str = r#"{
    "overall_rating": "[Excellent/Very Good/Good/Fair/Poor]",
    "overall_summary": "[2-3 sentence summary of the restaurant]",
    "food_quality": {
        "score": "[1-10]",
        "highlights": "[What stands out about the food]",
        "concerns": "[Any food-related issues mentioned]"
    },
    "service_quality": {
        "score": "[1-10]",
        "highlights": "[Service strengths]",
        "concerns": "[Service issues]"
    },
    "atmosphere": {
        "score": "[1-10]",
        "highlights": "[Ambiance positives]",
        "concerns": "[Ambiance issues]"
    },
    "value_for_money": {
        "score": "[1-10]",
        "assessment": "[Value assessment based on price vs quality]"
    },
    "key_highlights": ["[Top 3-5 positive aspects]"],
    "potential_concerns": ["[Top 2-3 concerns or negatives]"],
    "recommendation": "[Who should visit this restaurant and why]",
    "best_for": ["[Occasion types - Date night, Family dinner, Business lunch, etc.]"],
    "price_range_assessment": "[Is pricing fair for what you get?]",
    "confidence_score": [0.0-1.0 based on amount of review data available]
}"#;

/// Human description of a price tier for the prompt
pub fn price_description(level: &PriceLevel) -> String {
    match level {
        PriceLevel::Tier(1) => "Inexpensive ($)".to_string(),
        PriceLevel::Tier(2) => "Moderate ($$)".to_string(),
        PriceLevel::Tier(3) => "Expensive ($$$)".to_string(),
        PriceLevel::Tier(4) => "Very Expensive ($$$$)".to_string(),
        PriceLevel::Text(text) => format!("Price level: {}", text),
        PriceLevel::Tier(_) | PriceLevel::Unknown => "Price level unknown".to_string(),
    }
}

/// Prompt asking for a JSON analysis of one restaurant
pub fn build_analysis_prompt(profile: &RestaurantProfile) -> String {
    let name = profile.name.as_deref().unwrap_or("Unknown Restaurant");
    let rating = profile
        .rating
        .map_or_else(|| "No rating".to_string(), |r| r.to_string());
    let total_ratings = profile.total_ratings.unwrap_or(0);
    let cuisines = if profile.cuisine_types.is_empty() {
        "Not specified".to_string()
    } else {
        profile.cuisine_types.join(", ")
    };

    let mut reviews_text = String::new();
    let reviews = most_recent(&profile.reviews, MAX_PROMPT_REVIEWS);
    if !reviews.is_empty() {
        reviews_text.push_str("Recent Google Reviews:\n");
        for (i, review) in reviews.iter().enumerate() {
            let stars = review
                .rating
                .map_or_else(|| "N/A".to_string(), |r| r.to_string());
            let when = review.relative_time_description.as_deref().unwrap_or("Unknown");
            let text = if review.text.is_empty() { "No text" } else { &review.text };

            let _ = writeln!(reviews_text, "\nReview {} (Rating: {}/5):", i + 1, stars);
            let _ = writeln!(reviews_text, "Author: {}", review.author_name);
            let _ = writeln!(reviews_text, "Time: {}", when);
            let _ = writeln!(reviews_text, "Text: {}", text);
            reviews_text.push_str(&"-".repeat(40));
            reviews_text.push('\n');
        }
    }

    format!(
        "You are a professional restaurant critic and analyst. Please provide a comprehensive analysis of the following restaurant based on the available data:

RESTAURANT INFORMATION:
- Name: {name}
- Overall Google Rating: {rating}/5 ({total_ratings} reviews)
- Price Level: {price}
- Cuisine Types: {cuisines}

{reviews_text}
Please analyze this restaurant and provide a structured response in the following JSON format:

{schema}

Base your analysis on the actual review content, ratings, and restaurant information provided. Be honest about both positives and negatives. If there's limited data, reflect that in your confidence score.
",
        price = price_description(&profile.price_level),
        schema = RESPONSE_SCHEMA,
    )
}

/// Prompt asking for a free-text overview of an area's dining scene
pub fn build_area_prompt(places: &[AreaPlace]) -> String {
    let lines: Vec<String> = places
        .iter()
        .take(MAX_AREA_PLACES)
        .map(|place| {
            let rating = place.rating.map_or_else(|| "N/A".to_string(), |r| r.to_string());
            let distance = place
                .distance_miles
                .map_or_else(|| "N/A".to_string(), |d| d.to_string());
            let cuisine = place
                .cuisine_types
                .iter()
                .take(2)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "- {}: {}/5 stars, {} miles away, Cuisine: {}",
                place.name, rating, distance, cuisine
            )
        })
        .collect();

    format!(
        "Based on the following restaurants in the area, provide a brief summary of the dining options:

RESTAURANTS IN AREA:
{}

Please provide:
1. A 2-3 sentence overview of the dining scene in this area
2. Top 3 restaurant recommendations with brief reasons
3. Cuisine variety assessment
4. Overall quality level of restaurants in the area

Keep the response concise and helpful for someone looking for dining options.
",
        lines.join("\n")
    )
}
