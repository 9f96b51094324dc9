//! Review normalization
//!
//! Reviews from every source are reduced to one [`ReviewRecord`] shape and
//! grouped per source. Yelp is not wired up: asking for it yields an empty
//! block carrying an explanatory note.

use crate::places::{PlaceDetail, PlaceSource};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Note attached to the Yelp block
pub const YELP_NOT_IMPLEMENTED: &str = "Yelp integration not implemented yet";

/// Where a review came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSource {
    Google,
    Yelp,
}

impl std::fmt::Display for ReviewSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
            Self::Yelp => write!(f, "yelp"),
        }
    }
}

impl std::str::FromStr for ReviewSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "yelp" => Ok(Self::Yelp),
            _ => Err(format!("Unknown review source: {}", s)),
        }
    }
}

/// A single review in source-independent form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub source: ReviewSource,
    pub author_name: String,
    /// 1-5 stars
    pub rating: Option<u8>,
    pub text: String,
    /// Unix seconds
    pub time: Option<i64>,
    pub relative_time_description: Option<String>,
    #[serde(default)]
    pub profile_photo_url: String,
}

impl ReviewRecord {
    /// Normalize one entry of a Google `reviews` array
    pub fn from_google(raw: &Value) -> Self {
        let text_field = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            source: ReviewSource::Google,
            author_name: text_field("author_name").unwrap_or_else(|| "Anonymous".to_string()),
            rating: raw
                .get("rating")
                .and_then(Value::as_f64)
                .filter(|r| (1.0..=5.0).contains(r))
                .map(|r| r.round() as u8),
            text: text_field("text").unwrap_or_default(),
            time: raw.get("time").and_then(Value::as_i64),
            relative_time_description: text_field("relative_time_description"),
            profile_photo_url: text_field("profile_photo_url").unwrap_or_default(),
        }
    }
}

/// Reviews gathered from one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReviews {
    pub reviews: Vec<ReviewRecord>,
    pub total_count: usize,
    pub average_rating: Option<f64>,
    pub total_ratings: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SourceReviews {
    /// Google block built from a details lookup (or an empty one)
    pub fn google(detail: Option<&PlaceDetail>, limit: usize) -> Self {
        let reviews: Vec<ReviewRecord> = detail
            .map(|d| d.reviews.iter().take(limit).cloned().collect())
            .unwrap_or_default();

        Self {
            total_count: reviews.len(),
            reviews,
            average_rating: detail.and_then(|d| d.rating),
            total_ratings: detail.and_then(|d| d.total_ratings),
            note: None,
        }
    }

    /// Structurally valid empty Yelp block
    pub fn yelp_stub() -> Self {
        Self {
            reviews: Vec::new(),
            total_count: 0,
            average_rating: None,
            total_ratings: Some(0),
            note: Some(YELP_NOT_IMPLEMENTED.to_string()),
        }
    }
}

/// Reviews keyed by source
pub type ReviewsBySource = BTreeMap<ReviewSource, SourceReviews>;

/// Gather reviews for a place from the requested sources
///
/// A failed Google lookup yields an empty Google block rather than an error.
pub async fn collect_reviews<S: PlaceSource>(
    source: &S,
    place_id: &str,
    sources: &[ReviewSource],
    limit: usize,
) -> ReviewsBySource {
    let mut by_source = ReviewsBySource::new();

    if sources.contains(&ReviewSource::Google) {
        let detail = source.place_details(place_id, true).await;
        debug!(place_id, found = detail.is_some(), "fetched google reviews");
        by_source.insert(
            ReviewSource::Google,
            SourceReviews::google(detail.as_ref(), limit),
        );
    }

    if sources.contains(&ReviewSource::Yelp) {
        by_source.insert(ReviewSource::Yelp, SourceReviews::yelp_stub());
    }

    by_source
}

/// Most recent first; undated reviews go last
pub fn most_recent(reviews: &[ReviewRecord], limit: usize) -> Vec<ReviewRecord> {
    let mut sorted = reviews.to_vec();
    sorted.sort_by(|a, b| b.time.cmp(&a.time));
    sorted.truncate(limit);
    sorted
}
