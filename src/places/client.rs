//! Google Places web service client
//!
//! Nearby search (`/nearbysearch/json`) and place details (`/details/json`).
//! The base URL is injectable so tests can point it at a mock server.

use crate::constants::api::GOOGLE_PLACES_URL;
use crate::constants::search::PLACE_TYPE;
use crate::error::Result;
use crate::places::{PageRequest, PlaceDetail, PlaceSource, SearchPage};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("plate-finder/", env!("CARGO_PKG_VERSION"));

/// Fields always requested from the details endpoint
const DETAIL_FIELDS: &[&str] = &[
    "name",
    "formatted_address",
    "formatted_phone_number",
    "website",
    "opening_hours",
    "photos",
    "rating",
    "user_ratings_total",
    "price_level",
    "types",
];

/// Google Places client
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GooglePlacesClient {
    /// Create a client for the production Places API
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::with_base_url(api_key, GOOGLE_PLACES_URL, timeout)
    }

    /// Create a client with a custom base URL
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full photo URL for a photo reference
    ///
    /// Carries the API key, so only hand this to trusted callers.
    pub fn photo_url(&self, reference: &str, max_width: u32) -> String {
        format!(
            "{}/photo?maxwidth={}&photoreference={}&key={}",
            self.base_url,
            max_width,
            urlencoding::encode(reference),
            urlencoding::encode(&self.api_key)
        )
    }

    /// Comma-joined details field list; `reviews` only when asked for
    pub fn detail_fields(include_reviews: bool) -> String {
        let mut fields = DETAIL_FIELDS.to_vec();
        if include_reviews {
            fields.push("reviews");
        }
        fields.join(",")
    }

    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

impl PlaceSource for GooglePlacesClient {
    async fn nearby_page(&self, request: &PageRequest) -> Result<SearchPage> {
        let params = match request {
            PageRequest::First {
                origin,
                radius_meters,
            } => vec![
                ("location", origin.to_string()),
                ("radius", radius_meters.to_string()),
                ("type", PLACE_TYPE.to_string()),
            ],
            PageRequest::Next { token } => vec![("pagetoken", token.clone())],
        };

        let body = self.get_json("nearbysearch/json", &params).await?;
        let page = SearchPage::from_value(&body);
        debug!(
            status = %page.status,
            results = page.results.len(),
            has_next = page.next_page_token.is_some(),
            "nearby search page"
        );
        Ok(page)
    }

    async fn place_details(&self, place_id: &str, include_reviews: bool) -> Option<PlaceDetail> {
        let params = [
            ("place_id", place_id.to_string()),
            ("fields", Self::detail_fields(include_reviews)),
        ];

        let body = match self.get_json("details/json", &params).await {
            Ok(body) => body,
            Err(e) => {
                warn!(place_id, error = %e, "place details request failed");
                return None;
            }
        };

        let status = body.get("status").and_then(Value::as_str).unwrap_or("");
        if status != crate::constants::api::STATUS_OK {
            warn!(place_id, status, "place details API error");
            return None;
        }

        match body.get("result").filter(|r| r.is_object()) {
            Some(result) => Some(PlaceDetail::from_raw(place_id, result)),
            None => {
                warn!(place_id, "place details response had no result object");
                None
            }
        }
    }
}
