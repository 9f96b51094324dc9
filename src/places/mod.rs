//! Place search and detail lookup
//!
//! Provider payloads are handled as untyped JSON documents and projected into
//! the typed records below field by field, defaulting when a field is absent
//! or has the wrong shape.

pub mod client;
pub mod search;

pub use client::GooglePlacesClient;
pub use search::{PlaceFinder, SearchParams};

use crate::constants::api::STATUS_OK;
use crate::constants::search::MAX_PHOTOS;
use crate::error::Result;
use crate::geo::{distance_miles, round_to, Coordinates};
use crate::reviews::ReviewRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;

/// A restaurant returned by a nearby search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSummary {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: Option<f64>,
    pub total_ratings: Option<u64>,
    /// 1-4 scale, 1 = cheap, 4 = expensive (0 when the provider marks it free)
    pub price_level: Option<u8>,
    #[serde(default)]
    pub cuisine_types: Vec<String>,
    /// Photo references, at most three
    #[serde(default)]
    pub photos: Vec<String>,
    /// Miles from the search origin, rounded to two decimals
    pub distance_miles: f64,
}

impl PlaceSummary {
    /// Project a raw nearby-search record, computing distance from `origin`
    pub fn from_raw(raw: &Value, origin: Coordinates) -> Self {
        let coords = raw_location(raw);
        Self {
            place_id: str_field(raw, "place_id").unwrap_or_default(),
            name: str_field(raw, "name").unwrap_or_else(|| "Unknown".to_string()),
            address: str_field(raw, "vicinity")
                .unwrap_or_else(|| "Address not available".to_string()),
            latitude: coords.lat,
            longitude: coords.lng,
            rating: raw_rating(raw),
            total_ratings: raw.get("user_ratings_total").and_then(Value::as_u64),
            price_level: raw_price_level(raw),
            cuisine_types: str_list(raw, "types"),
            photos: photo_references(raw),
            distance_miles: round_to(distance_miles(origin, coords), 2),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Structured opening hours
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningHours {
    pub open_now: Option<bool>,
    #[serde(default)]
    pub weekday_text: Vec<String>,
}

/// Extended fields for a single place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetail {
    pub place_id: String,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<OpeningHours>,
    pub rating: Option<f64>,
    pub total_ratings: Option<u64>,
    pub price_level: Option<u8>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub reviews: Vec<ReviewRecord>,
}

impl PlaceDetail {
    /// Project a raw place-details `result` object
    pub fn from_raw(place_id: &str, raw: &Value) -> Self {
        let opening_hours = raw.get("opening_hours").filter(|v| v.is_object()).map(|hours| {
            OpeningHours {
                open_now: hours.get("open_now").and_then(Value::as_bool),
                weekday_text: str_list(hours, "weekday_text"),
            }
        });

        let reviews = raw
            .get("reviews")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(ReviewRecord::from_google).collect())
            .unwrap_or_default();

        Self {
            place_id: place_id.to_string(),
            name: str_field(raw, "name"),
            formatted_address: str_field(raw, "formatted_address"),
            phone: str_field(raw, "formatted_phone_number"),
            website: str_field(raw, "website"),
            opening_hours,
            rating: raw_rating(raw),
            total_ratings: raw.get("user_ratings_total").and_then(Value::as_u64),
            price_level: raw_price_level(raw),
            types: str_list(raw, "types"),
            photos: photo_references(raw),
            reviews,
        }
    }
}

/// Which page of a nearby search to fetch
#[derive(Debug, Clone, PartialEq)]
pub enum PageRequest {
    First {
        origin: Coordinates,
        radius_meters: u32,
    },
    Next {
        token: String,
    },
}

/// One page of nearby-search output
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub status: String,
    pub results: Vec<Value>,
    pub next_page_token: Option<String>,
}

impl SearchPage {
    pub fn from_value(body: &Value) -> Self {
        Self {
            status: str_field(body, "status").unwrap_or_default(),
            results: body
                .get("results")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            next_page_token: str_field(body, "next_page_token").filter(|t| !t.is_empty()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Backend for place search and detail lookup
///
/// `nearby_page` surfaces transport failures as errors and leaves status
/// interpretation to the caller. `place_details` never fails: every
/// problem collapses to `None`.
pub trait PlaceSource: Send + Sync {
    fn nearby_page(&self, request: &PageRequest) -> impl Future<Output = Result<SearchPage>> + Send;

    fn place_details(
        &self,
        place_id: &str,
        include_reviews: bool,
    ) -> impl Future<Output = Option<PlaceDetail>> + Send;
}

fn str_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}

fn str_list(raw: &Value, key: &str) -> Vec<String> {
    raw.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn raw_rating(raw: &Value) -> Option<f64> {
    raw.get("rating")
        .and_then(Value::as_f64)
        .filter(|r| (0.0..=5.0).contains(r))
}

fn raw_price_level(raw: &Value) -> Option<u8> {
    raw.get("price_level")
        .and_then(Value::as_u64)
        .filter(|p| *p <= 4)
        .map(|p| p as u8)
}

fn raw_location(raw: &Value) -> Coordinates {
    let location = raw.get("geometry").and_then(|g| g.get("location"));
    let component = |key: &str| {
        location
            .and_then(|l| l.get(key))
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    };
    Coordinates::new(component("lat"), component("lng"))
}

fn photo_references(raw: &Value) -> Vec<String> {
    raw.get("photos")
        .and_then(Value::as_array)
        .map(|photos| {
            photos
                .iter()
                .take(MAX_PHOTOS)
                .filter_map(|p| str_field(p, "photo_reference"))
                .collect()
        })
        .unwrap_or_default()
}
