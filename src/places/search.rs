//! Paginated nearby search
//!
//! Drives the nearby-search endpoint page by page. Every page is filtered
//! and capped the same way; results are sorted by distance ascending with
//! rating descending as the tie-break.
//!
//! A page token only becomes valid a short while after it is issued, so
//! each continuation waits `page_delay` first. That wait (and the request
//! after it) can be interrupted through a `watch` channel; an interrupted
//! search returns what it already has.

use crate::config::SearchConfig;
use crate::constants::api::STATUS_ZERO_RESULTS;
use crate::constants::search::{MAX_RESULTS_LIMIT, MIN_RADIUS_MILES};
use crate::error::{Error, Result};
use crate::geo::{distance_miles, miles_to_meters, Coordinates};
use crate::places::{PageRequest, PlaceDetail, PlaceSource, PlaceSummary};
use serde_json::Value;
use std::cmp::Ordering;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Parameters of one search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    pub origin: Coordinates,
    pub radius_miles: f64,
    pub min_rating: f64,
    pub max_results: usize,
}

impl SearchParams {
    pub fn new(origin: Coordinates, radius_miles: f64, min_rating: f64, max_results: usize) -> Self {
        Self {
            origin,
            radius_miles,
            min_rating,
            max_results,
        }
    }

    /// Copy with every knob pulled into its allowed range
    pub fn bounded(&self, max_radius_miles: f64) -> Self {
        let max_radius = max_radius_miles.max(MIN_RADIUS_MILES);
        Self {
            origin: self.origin,
            radius_miles: clamp_or(self.radius_miles, MIN_RADIUS_MILES, max_radius, max_radius),
            min_rating: clamp_or(self.min_rating, 0.0, 5.0, 0.0),
            max_results: self.max_results.clamp(1, MAX_RESULTS_LIMIT),
        }
    }
}

fn clamp_or(value: f64, min: f64, max: f64, nan_default: f64) -> f64 {
    if value.is_nan() {
        nan_default
    } else {
        value.clamp(min, max)
    }
}

/// Restaurant finder over a place backend
#[derive(Debug, Clone)]
pub struct PlaceFinder<S> {
    source: S,
    page_delay: Duration,
    max_radius_miles: f64,
}

impl<S: PlaceSource> PlaceFinder<S> {
    pub fn new(source: S, page_delay: Duration, max_radius_miles: f64) -> Self {
        Self {
            source,
            page_delay,
            max_radius_miles,
        }
    }

    pub fn from_config(source: S, config: &SearchConfig) -> Self {
        Self::new(source, config.page_token_delay(), config.max_radius_miles)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn max_radius_miles(&self) -> f64 {
        self.max_radius_miles
    }

    /// Search without a cancel signal
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<PlaceSummary>> {
        self.run(params, None).await
    }

    /// Search that stops issuing pages once `cancel` reads `true`
    pub async fn search_with_cancel(
        &self,
        params: &SearchParams,
        cancel: watch::Receiver<bool>,
    ) -> Result<Vec<PlaceSummary>> {
        self.run(params, Some(cancel)).await
    }

    /// Extended fields for one place; `None` covers every failure
    pub async fn details(&self, place_id: &str, include_reviews: bool) -> Option<PlaceDetail> {
        self.source.place_details(place_id, include_reviews).await
    }

    async fn run(
        &self,
        params: &SearchParams,
        mut cancel: Option<watch::Receiver<bool>>,
    ) -> Result<Vec<PlaceSummary>> {
        params.origin.validate()?;
        let params = params.bounded(self.max_radius_miles);
        if !params.radius_miles.is_finite() {
            return Err(Error::InvalidRadius(format!("{}", params.radius_miles)));
        }

        let first = self
            .source
            .nearby_page(&PageRequest::First {
                origin: params.origin,
                radius_meters: miles_to_meters(params.radius_miles),
            })
            .await?;

        if first.status == STATUS_ZERO_RESULTS {
            info!(origin = %params.origin, "nearby search found nothing");
            return Ok(Vec::new());
        }
        if !first.is_ok() {
            return Err(Error::Upstream {
                service: "Google Places",
                status: if first.status.is_empty() {
                    "Unknown error".to_string()
                } else {
                    first.status
                },
            });
        }

        let mut places = Vec::with_capacity(params.max_results);
        collect_page(&first.results, &params, &mut places);

        let mut next_token = first.next_page_token;
        let mut pages = 1;
        while let Some(token) = next_token.take() {
            if places.len() >= params.max_results {
                break;
            }

            let fetch = async {
                tokio::time::sleep(self.page_delay).await;
                self.source.nearby_page(&PageRequest::Next { token }).await
            };
            let Some(outcome) = until_cancelled(&mut cancel, fetch).await else {
                info!(pages, collected = places.len(), "search cancelled, returning partial results");
                break;
            };

            let page = match outcome {
                Ok(page) => page,
                Err(e) => {
                    warn!(pages, error = %e, "continuation page failed, keeping partial results");
                    break;
                }
            };
            if !page.is_ok() {
                warn!(pages, status = %page.status, "continuation page returned non-OK status");
                break;
            }

            pages += 1;
            collect_page(&page.results, &params, &mut places);
            next_token = page.next_page_token;
        }

        sort_places(&mut places);
        debug!(pages, found = places.len(), "nearby search complete");
        Ok(places)
    }
}

/// Filter one page's raw records into `places`, stopping at the cap
fn collect_page(raw: &[Value], params: &SearchParams, places: &mut Vec<PlaceSummary>) {
    for record in raw {
        if places.len() >= params.max_results {
            break;
        }

        let rating = record.get("rating").and_then(Value::as_f64).unwrap_or(0.0);
        if rating < params.min_rating {
            continue;
        }

        let place = PlaceSummary::from_raw(record, params.origin);
        // The provider treats radius as a bias, not a hard bound
        if distance_miles(params.origin, place.coordinates()) > params.radius_miles {
            continue;
        }
        places.push(place);
    }
}

/// Distance ascending, then rating descending (missing rating counts as 0)
pub fn sort_places(places: &mut [PlaceSummary]) {
    places.sort_by(|a, b| {
        a.distance_miles
            .total_cmp(&b.distance_miles)
            .then_with(|| {
                let ra = a.rating.unwrap_or(0.0);
                let rb = b.rating.unwrap_or(0.0);
                rb.partial_cmp(&ra).unwrap_or(Ordering::Equal)
            })
    });
}

/// Run `fut` unless the cancel signal fires first
async fn until_cancelled<F: Future>(
    cancel: &mut Option<watch::Receiver<bool>>,
    fut: F,
) -> Option<F::Output> {
    let Some(rx) = cancel.as_mut() else {
        return Some(fut.await);
    };
    if *rx.borrow() {
        return None;
    }

    tokio::select! {
        biased;
        _ = cancelled(rx) => None,
        out = fut => Some(out),
    }
}

async fn cancelled(rx: &mut watch::Receiver<bool>) {
    let closed = rx.wait_for(|c| *c).await.is_err();
    if closed {
        // Sender dropped without cancelling: never fires
        std::future::pending::<()>().await;
    }
}
