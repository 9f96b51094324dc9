//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::analysis::{AnalysisResult, AreaPlace, RestaurantProfile};
use crate::constants::search::{
    AREA_ANALYSIS_MAX_PLACES, AREA_DEFAULT_RADIUS_MILES, DEFAULT_REVIEW_LIMIT, MAX_RESULTS_LIMIT,
    MAX_REVIEW_LIMIT, MIN_RADIUS_MILES,
};
use crate::error::Error;
use crate::geo::Coordinates;
use crate::location::LocationResult;
use crate::places::{PlaceDetail, PlaceSummary, SearchParams};
use crate::reviews::{collect_reviews, ReviewSource, ReviewsBySource};
use crate::server::state::AppState;

use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/restaurants", get(restaurants_handler))
        .route("/restaurants/auto", get(restaurants_auto_handler))
        .route("/restaurants/area-analysis", get(area_analysis_handler))
        .route("/restaurant/:place_id", get(restaurant_details_handler))
        .route("/restaurant/:place_id/analysis", get(restaurant_analysis_handler))
        .route("/restaurant/:place_id/reviews", get(restaurant_reviews_handler))
        .route("/location/detect", get(location_detect_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

type ApiFailure = (StatusCode, Json<ApiError>);
type ApiResult<T> = std::result::Result<Json<T>, ApiFailure>;

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::InvalidRadius(_) => "INVALID_RADIUS",
            Error::InvalidParameter(_) => "INVALID_PARAMETER",
            Error::MissingApiKey(_) => "MISSING_API_KEY",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Upstream { .. } | Error::Http(_) => "UPSTREAM_ERROR",
            Error::Location(_) => "LOCATION_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
            _ => "INTERNAL_ERROR",
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
        }
    }
}

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::InvalidCoordinates(_) | Error::InvalidRadius(_) | Error::InvalidParameter(_) => {
            StatusCode::BAD_REQUEST
        }
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Upstream { .. } | Error::Http(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(err: Error) -> ApiFailure {
    (status_for(&err), Json(ApiError::from(err)))
}

fn failure(status: StatusCode, code: &str, message: &str) -> ApiFailure {
    (
        status,
        Json(ApiError {
            error: message.to_string(),
            code: code.to_string(),
        }),
    )
}

/// Requester IP worth geolocating; loopback and private addresses are dropped
fn client_ip(connect: Option<ConnectInfo<SocketAddr>>) -> Option<String> {
    let ip = connect?.0.ip();
    let routable = match ip {
        IpAddr::V4(v4) => {
            !(v4.is_loopback() || v4.is_private() || v4.is_unspecified() || v4.is_link_local())
        }
        IpAddr::V6(v6) => !(v6.is_loopback() || v6.is_unspecified()),
    };
    routable.then(|| ip.to_string())
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

/// GET /
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Plate Finder API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Search knobs shared by the search endpoints
#[derive(Debug, Clone, Copy)]
struct SearchBounds {
    radius_miles: f64,
    min_rating: f64,
    max_results: usize,
}

impl SearchBounds {
    /// Reject out-of-range knobs instead of clamping them
    fn validate(
        state: &AppState,
        radius: Option<f64>,
        min_rating: Option<f64>,
        max_results: Option<usize>,
    ) -> Result<Self, ApiFailure> {
        let radius_miles = radius.unwrap_or_else(|| state.default_radius());
        let max_radius = state.max_radius();
        if !(MIN_RADIUS_MILES..=max_radius).contains(&radius_miles) {
            return Err(reject(Error::InvalidRadius(format!(
                "radius must be between {} and {} miles",
                MIN_RADIUS_MILES, max_radius
            ))));
        }

        let min_rating = min_rating.unwrap_or(0.0);
        if !(0.0..=5.0).contains(&min_rating) {
            return Err(reject(Error::InvalidParameter(
                "min_rating must be between 0 and 5".to_string(),
            )));
        }

        let max_results = max_results.unwrap_or(state.config.search.default_max_results);
        if !(1..=MAX_RESULTS_LIMIT).contains(&max_results) {
            return Err(reject(Error::InvalidParameter(format!(
                "max_results must be between 1 and {}",
                MAX_RESULTS_LIMIT
            ))));
        }

        Ok(Self {
            radius_miles,
            min_rating,
            max_results,
        })
    }

    fn params(&self, origin: Coordinates) -> SearchParams {
        SearchParams::new(origin, self.radius_miles, self.min_rating, self.max_results)
    }
}

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
    pub min_rating: Option<f64>,
    pub max_results: Option<usize>,
}

/// Search response
#[derive(Debug, Serialize, Deserialize)]
pub struct RestaurantSearchResponse {
    pub restaurants: Vec<PlaceSummary>,
    pub total_found: usize,
    pub search_location: Coordinates,
    pub radius_miles: f64,
    pub timestamp: DateTime<Utc>,
}

fn required_origin(lat: Option<f64>, lng: Option<f64>) -> Result<Coordinates, ApiFailure> {
    let (Some(lat), Some(lng)) = (lat, lng) else {
        return Err(reject(Error::InvalidParameter(
            "lat and lng are required".to_string(),
        )));
    };
    Coordinates::checked(lat, lng).map_err(reject)
}

async fn run_search(
    state: &AppState,
    origin: Coordinates,
    bounds: SearchBounds,
) -> ApiResult<RestaurantSearchResponse> {
    let finder = state.services.finder().map_err(reject)?;
    let restaurants = finder.search(&bounds.params(origin)).await.map_err(reject)?;

    info!(%origin, found = restaurants.len(), "restaurant search");
    Ok(Json(RestaurantSearchResponse {
        total_found: restaurants.len(),
        restaurants,
        search_location: origin,
        radius_miles: bounds.radius_miles,
        timestamp: Utc::now(),
    }))
}

/// GET /restaurants
async fn restaurants_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<RestaurantSearchResponse> {
    let origin = required_origin(query.lat, query.lng)?;
    let bounds = SearchBounds::validate(&state, query.radius, query.min_rating, query.max_results)?;
    run_search(&state, origin, bounds).await
}

/// Auto-located search query parameters
#[derive(Debug, Deserialize)]
pub struct AutoSearchQuery {
    pub address: Option<String>,
    pub radius: Option<f64>,
    pub min_rating: Option<f64>,
    pub max_results: Option<usize>,
}

/// GET /restaurants/auto
async fn restaurants_auto_handler(
    State(state): State<Arc<AppState>>,
    connect: Option<ConnectInfo<SocketAddr>>,
    Query(query): Query<AutoSearchQuery>,
) -> ApiResult<RestaurantSearchResponse> {
    let bounds = SearchBounds::validate(&state, query.radius, query.min_rating, query.max_results)?;
    let ip = client_ip(connect);

    let location = state
        .services
        .resolver
        .resolve(None, query.address.as_deref(), ip.as_deref())
        .await
        .ok_or_else(|| {
            failure(
                StatusCode::BAD_REQUEST,
                "LOCATION_UNAVAILABLE",
                "Could not determine your location. Please provide an address or coordinates manually.",
            )
        })?;

    run_search(&state, location.coordinates(), bounds).await
}

/// Area analysis query parameters
#[derive(Debug, Deserialize)]
pub struct AreaQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
}

/// Area analysis response
#[derive(Debug, Serialize, Deserialize)]
pub struct AreaAnalysisResponse {
    pub search_location: Coordinates,
    pub radius_miles: f64,
    pub restaurants_analyzed: usize,
    pub area_analysis: String,
    pub timestamp: DateTime<Utc>,
}

/// GET /restaurants/area-analysis
async fn area_analysis_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AreaQuery>,
) -> ApiResult<AreaAnalysisResponse> {
    let origin = required_origin(query.lat, query.lng)?;
    let bounds = SearchBounds::validate(
        &state,
        Some(query.radius.unwrap_or(AREA_DEFAULT_RADIUS_MILES)),
        None,
        Some(AREA_ANALYSIS_MAX_PLACES),
    )?;

    let finder = state.services.finder().map_err(reject)?;
    let places = finder.search(&bounds.params(origin)).await.map_err(reject)?;
    let area: Vec<AreaPlace> = places.iter().map(AreaPlace::from).collect();
    let area_analysis = state.services.analysis.analyze_area(&area).await;

    Ok(Json(AreaAnalysisResponse {
        search_location: origin,
        radius_miles: bounds.radius_miles,
        restaurants_analyzed: area.len(),
        area_analysis,
        timestamp: Utc::now(),
    }))
}

/// Details query parameters
#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    pub include_reviews: Option<bool>,
}

/// Details response
#[derive(Debug, Serialize, Deserialize)]
pub struct DetailsResponse {
    pub place_id: String,
    pub details: PlaceDetail,
    pub timestamp: DateTime<Utc>,
}

async fn lookup_place(
    state: &AppState,
    place_id: &str,
    include_reviews: bool,
) -> Result<PlaceDetail, ApiFailure> {
    let finder = state.services.finder().map_err(reject)?;
    finder
        .details(place_id, include_reviews)
        .await
        .ok_or_else(|| reject(Error::NotFound("Restaurant".to_string())))
}

/// GET /restaurant/:place_id
async fn restaurant_details_handler(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<String>,
    Query(query): Query<DetailsQuery>,
) -> ApiResult<DetailsResponse> {
    let details = lookup_place(&state, &place_id, query.include_reviews.unwrap_or(true)).await?;

    Ok(Json(DetailsResponse {
        place_id,
        details,
        timestamp: Utc::now(),
    }))
}

/// Analysis response
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub place_id: String,
    pub restaurant_name: Option<String>,
    pub ai_analysis: AnalysisResult,
    pub timestamp: DateTime<Utc>,
}

/// GET /restaurant/:place_id/analysis
async fn restaurant_analysis_handler(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<String>,
) -> ApiResult<AnalysisResponse> {
    let details = lookup_place(&state, &place_id, true).await?;
    let profile = RestaurantProfile::from(&details);
    let ai_analysis = state.services.analysis.analyze_single_restaurant(&profile).await;

    Ok(Json(AnalysisResponse {
        place_id,
        restaurant_name: details.name,
        ai_analysis,
        timestamp: Utc::now(),
    }))
}

/// Reviews query parameters
#[derive(Debug, Deserialize)]
pub struct ReviewsQuery {
    /// Comma-separated source names
    pub sources: Option<String>,
    pub limit: Option<usize>,
}

/// Reviews response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewsResponse {
    pub place_id: String,
    pub reviews_by_source: ReviewsBySource,
    pub timestamp: DateTime<Utc>,
}

fn parse_sources(raw: Option<&str>) -> Result<Vec<ReviewSource>, ApiFailure> {
    let Some(raw) = raw else {
        return Ok(vec![ReviewSource::Google]);
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<ReviewSource>().map_err(|e| reject(Error::InvalidParameter(e))))
        .collect()
}

/// GET /restaurant/:place_id/reviews
async fn restaurant_reviews_handler(
    State(state): State<Arc<AppState>>,
    Path(place_id): Path<String>,
    Query(query): Query<ReviewsQuery>,
) -> ApiResult<ReviewsResponse> {
    let sources = parse_sources(query.sources.as_deref())?;
    let limit = query.limit.unwrap_or(DEFAULT_REVIEW_LIMIT);
    if !(1..=MAX_REVIEW_LIMIT).contains(&limit) {
        return Err(reject(Error::InvalidParameter(format!(
            "limit must be between 1 and {}",
            MAX_REVIEW_LIMIT
        ))));
    }

    let finder = state.services.finder().map_err(reject)?;
    let reviews_by_source = collect_reviews(finder.source(), &place_id, &sources, limit).await;

    Ok(Json(ReviewsResponse {
        place_id,
        reviews_by_source,
        timestamp: Utc::now(),
    }))
}

/// Location detection query parameters
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Location detection response
#[derive(Debug, Serialize, Deserialize)]
pub struct LocationResponse {
    pub location: LocationResult,
    pub timestamp: DateTime<Utc>,
}

/// GET /location/detect
async fn location_detect_handler(
    State(state): State<Arc<AppState>>,
    connect: Option<ConnectInfo<SocketAddr>>,
    Query(query): Query<LocationQuery>,
) -> ApiResult<LocationResponse> {
    let coords = query.lat.zip(query.lng).map(|(lat, lng)| Coordinates::new(lat, lng));
    let ip = client_ip(connect);

    let location = state
        .services
        .resolver
        .resolve(coords, query.address.as_deref(), ip.as_deref())
        .await
        .ok_or_else(|| {
            failure(
                StatusCode::BAD_REQUEST,
                "LOCATION_UNAVAILABLE",
                "Could not determine location from IP or address",
            )
        })?;

    Ok(Json(LocationResponse {
        location,
        timestamp: Utc::now(),
    }))
}
