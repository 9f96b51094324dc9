//! Per-place command handlers: details, reviews, analyze

use crate::analysis::RestaurantProfile;
use crate::cli::print_json;
use crate::config::Config;
use crate::constants::search::{DEFAULT_REVIEW_LIMIT, MAX_REVIEW_LIMIT};
use crate::error::{Error, Result};
use crate::places::PlaceDetail;
use crate::reviews::{collect_reviews, ReviewSource};
use crate::services::Services;
use clap::Args;
use serde_json::json;

/// Details command arguments
#[derive(Args)]
pub struct DetailsArgs {
    /// Google place ID
    pub place_id: String,

    /// Skip reviews
    #[arg(long)]
    pub no_reviews: bool,
}

/// Reviews command arguments
#[derive(Args)]
pub struct ReviewsArgs {
    /// Google place ID
    pub place_id: String,

    /// Review source, repeatable (google, yelp)
    #[arg(long, short = 's', default_value = "google")]
    pub source: Vec<ReviewSource>,

    /// Maximum reviews per source
    #[arg(long, short = 'l', default_value_t = DEFAULT_REVIEW_LIMIT)]
    pub limit: usize,
}

/// Analyze command arguments
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Google place ID
    pub place_id: String,
}

async fn fetch_place(services: &Services, place_id: &str, include_reviews: bool) -> Result<PlaceDetail> {
    services
        .finder()?
        .details(place_id, include_reviews)
        .await
        .ok_or_else(|| Error::NotFound(format!("Place {}", place_id)))
}

/// Run the details command
pub async fn run_details(args: DetailsArgs) -> Result<()> {
    let config = Config::load()?;
    let services = Services::from_config(&config)?;

    let details = fetch_place(&services, &args.place_id, !args.no_reviews).await?;
    print_json(&details)
}

/// Run the reviews command
pub async fn run_reviews(args: ReviewsArgs) -> Result<()> {
    if !(1..=MAX_REVIEW_LIMIT).contains(&args.limit) {
        return Err(Error::InvalidParameter(format!(
            "limit must be between 1 and {}",
            MAX_REVIEW_LIMIT
        )));
    }

    let config = Config::load()?;
    let services = Services::from_config(&config)?;
    let finder = services.finder()?;

    let reviews = collect_reviews(finder.source(), &args.place_id, &args.source, args.limit).await;
    print_json(&json!({
        "place_id": args.place_id,
        "reviews_by_source": reviews,
    }))
}

/// Run the analyze command
pub async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = Config::load()?;
    let services = Services::from_config(&config)?;

    let details = fetch_place(&services, &args.place_id, true).await?;
    if !services.analysis.has_model() {
        eprintln!("OpenAI API key not configured; using rating-based analysis");
    }
    let analysis = services
        .analysis
        .analyze_single_restaurant(&RestaurantProfile::from(&details))
        .await;

    print_json(&json!({
        "place_id": args.place_id,
        "restaurant_name": details.name,
        "ai_analysis": analysis,
    }))
}
