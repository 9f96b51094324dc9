//! plate-finder: nearby restaurant search with review-driven analysis
//!
//! A library and CLI tool that finds restaurants around a point using the
//! Google Places API, normalizes their reviews, and produces a structured
//! analysis with a language model (or a rule-based fallback).
//!
//! ## Features
//!
//! - Paginated nearby search with rating filter, radius bound and result cap
//! - Location resolution from coordinates, an address, or the caller's IP
//! - Per-source review normalization (Google, Yelp placeholder)
//! - Model-backed restaurant and area analysis with validation and fallback
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use plate_finder::geo::{distance_miles, Coordinates};
//! use plate_finder::analysis::{create_fallback_analysis, RestaurantProfile};
//!
//! let nyc = Coordinates::new(40.7128, -74.0060);
//! let philly = Coordinates::new(39.9526, -75.1652);
//! println!("{:.1} miles", distance_miles(nyc, philly));
//!
//! let profile = RestaurantProfile {
//!     name: Some("Corner Bistro".to_string()),
//!     rating: Some(4.4),
//!     total_ratings: Some(812),
//!     ..Default::default()
//! };
//! let analysis = create_fallback_analysis(&profile);
//! assert_eq!(analysis.confidence_score, 0.3);
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod geo;
pub mod location;
pub mod places;
pub mod reviews;
pub mod server;
pub mod services;

// Re-export commonly used types
pub use analysis::{AnalysisEngine, AnalysisResult, RestaurantProfile};
pub use config::Config;
pub use error::{Error, Result};
pub use geo::Coordinates;
pub use location::{LocationResolver, LocationResult};
pub use places::{PlaceDetail, PlaceFinder, PlaceSummary, SearchParams};
pub use services::Services;
