//! Search and area command handlers

use crate::analysis::AreaPlace;
use crate::cli::print_json;
use crate::config::Config;
use crate::constants::search::{AREA_ANALYSIS_MAX_PLACES, AREA_DEFAULT_RADIUS_MILES};
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter, SearchReport};
use crate::geo::Coordinates;
use crate::location::Geocoder;
use crate::places::SearchParams;
use crate::services::{Resolver, Services};
use clap::Args;
use serde_json::json;
use tokio::sync::watch;
use tracing::info;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Latitude of the search center
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude of the search center
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Address to search around (geocoded)
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub address: Option<String>,

    /// Search radius in miles
    #[arg(long, short = 'r')]
    pub radius: Option<f64>,

    /// Minimum star rating
    #[arg(long, default_value_t = 0.0)]
    pub min_rating: f64,

    /// Maximum number of results
    #[arg(long, short = 'n')]
    pub max_results: Option<usize>,

    /// Output format (json, text)
    #[arg(long, short = 'f', default_value = "json")]
    pub format: String,
}

/// Area command arguments
#[derive(Args)]
pub struct AreaArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Search radius in miles
    #[arg(long, short = 'r', default_value_t = AREA_DEFAULT_RADIUS_MILES)]
    pub radius: f64,
}

/// Center of a CLI search: explicit point, geocoded address, or IP location
async fn search_origin(resolver: &Resolver, args: &SearchArgs) -> Result<Coordinates> {
    if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        return Coordinates::checked(lat, lng);
    }

    if let Some(address) = &args.address {
        let location = resolver
            .geocoder()
            .geocode(address)
            .await?
            .ok_or_else(|| Error::Location(format!("Could not geocode '{}'", address)))?;
        eprintln!("Geocoded to: {}", location.coordinates());
        return Ok(location.coordinates());
    }

    let location = resolver
        .resolve(None, None, None)
        .await
        .ok_or_else(|| Error::Location("Could not determine your location".to_string()))?;
    eprintln!(
        "Using IP location: {}",
        location.city.as_deref().unwrap_or("unknown city")
    );
    Ok(location.coordinates())
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    let Some(formatter) = get_formatter(&args.format) else {
        let names: Vec<String> = available_formats().into_iter().map(|f| f.name).collect();
        return Err(Error::InvalidParameter(format!(
            "Unknown format '{}' (available: {})",
            args.format,
            names.join(", ")
        )));
    };

    let config = Config::load()?;
    let services = Services::from_config(&config)?;
    let finder = services.finder()?;

    let origin = search_origin(&services.resolver, &args).await?;
    let params = SearchParams::new(
        origin,
        args.radius.unwrap_or(config.search.default_radius_miles),
        args.min_rating,
        args.max_results.unwrap_or(config.search.default_max_results),
    )
    .bounded(finder.max_radius_miles());

    // Ctrl-C stops pagination and keeps what was already collected
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send(true);
        }
    });
    let places = finder.search_with_cancel(&params, cancel_rx).await;
    interrupt.abort();
    let places = places?;

    info!(found = places.len(), "search finished");
    let report = SearchReport::new(origin, params.radius_miles, places);
    print!("{}", formatter.format(&report)?);
    if formatter.name() == "json" {
        println!();
    }
    Ok(())
}

/// Run the area command
pub async fn run_area(args: AreaArgs) -> Result<()> {
    let config = Config::load()?;
    let services = Services::from_config(&config)?;
    let finder = services.finder()?;

    let origin = Coordinates::checked(args.lat, args.lng)?;
    let params = SearchParams::new(origin, args.radius, 0.0, AREA_ANALYSIS_MAX_PLACES)
        .bounded(finder.max_radius_miles());
    let places = finder.search(&params).await?;

    let area: Vec<AreaPlace> = places.iter().map(AreaPlace::from).collect();
    let analysis = services.analysis.analyze_area(&area).await;

    print_json(&json!({
        "search_location": origin,
        "radius_miles": params.radius_miles,
        "restaurants_analyzed": area.len(),
        "area_analysis": analysis,
    }))
}
