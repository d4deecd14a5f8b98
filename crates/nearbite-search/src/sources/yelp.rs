//! Primary candidate source: Yelp Fusion business search.

use async_trait::async_trait;
use nearbite_core::{Candidate, Coordinate, PriceTier, SearchQuery};
use reqwest::{Client, Url};
use serde::Deserialize;

use super::http::{build_client, endpoint, non_blank, parse_base_url, send_json};
use crate::error::SourceError;
use crate::source::CandidateSource;

const DEFAULT_BASE_URL: &str = "https://api.yelp.com";
const SEARCH_PATH: &str = "v3/businesses/search";
const SOURCE_NAME: &str = "yelp";

/// Yelp rejects radii above 40 km.
const MAX_RADIUS_M: u32 = 40_000;
/// Yelp caps page size at 50.
const MAX_LIMIT: u32 = 50;

/// Client for `GET /v3/businesses/search`.
///
/// Use [`YelpSource::new`] for production or [`YelpSource::with_base_url`] to
/// point at a mock server in tests.
pub struct YelpSource {
    client: Client,
    api_key: String,
    search_url: Url,
}

impl YelpSource {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SourceError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the client cannot be constructed, or
    /// [`SourceError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SourceError> {
        let client = build_client(timeout_secs, user_agent)?;
        let search_url = endpoint(&parse_base_url(base_url)?, SEARCH_PATH)?;
        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            search_url,
        })
    }

    fn query_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
        vec![
            ("term", query.term.clone()),
            ("latitude", query.origin.latitude.to_string()),
            ("longitude", query.origin.longitude.to_string()),
            ("radius", query.radius_m.min(MAX_RADIUS_M).to_string()),
            ("limit", query.limit.clamp(1, MAX_LIMIT).to_string()),
            ("sort_by", "best_match".to_string()),
        ]
    }
}

#[async_trait]
impl CandidateSource for YelpSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>, SourceError> {
        let request = self
            .client
            .get(self.search_url.clone())
            .bearer_auth(&self.api_key)
            .query(&Self::query_params(query));

        let context = format!(
            "yelp businesses/search(origin={}, radius={})",
            query.origin, query.radius_m
        );
        let response: YelpSearchResponse = send_json(SOURCE_NAME, request, &context).await?;

        let total = response.businesses.len();
        let candidates: Vec<Candidate> = response
            .businesses
            .into_iter()
            .filter_map(YelpBusiness::into_candidate)
            .collect();

        if candidates.len() < total {
            tracing::debug!(
                source = SOURCE_NAME,
                skipped = total - candidates.len(),
                "skipped businesses without usable coordinates"
            );
        }
        Ok(candidates)
    }
}

#[derive(Debug, Deserialize)]
struct YelpSearchResponse {
    #[serde(default)]
    businesses: Vec<YelpBusiness>,
}

#[derive(Debug, Deserialize)]
struct YelpBusiness {
    id: String,
    name: String,
    #[serde(default)]
    coordinates: Option<YelpCoordinates>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    categories: Vec<YelpCategory>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    display_phone: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    review_count: Option<u32>,
    #[serde(default)]
    is_closed: bool,
    #[serde(default)]
    business_hours: Vec<YelpBusinessHours>,
    #[serde(default)]
    location: Option<YelpLocation>,
}

#[derive(Debug, Deserialize)]
struct YelpCoordinates {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YelpCategory {
    title: String,
}

#[derive(Debug, Deserialize)]
struct YelpBusinessHours {
    #[serde(default)]
    is_open_now: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct YelpLocation {
    #[serde(default)]
    display_address: Vec<String>,
}

impl YelpBusiness {
    /// `None` when the record has no usable coordinate; such places cannot be
    /// ranked or deduplicated.
    fn into_candidate(self) -> Option<Candidate> {
        let coords = self.coordinates?;
        let coordinate = Coordinate::new(coords.latitude?, coords.longitude?);
        if !coordinate.is_valid() {
            return None;
        }

        // `is_closed` means permanently closed; prefer the live hours flag.
        let is_open_now = self
            .business_hours
            .iter()
            .find_map(|h| h.is_open_now)
            .unwrap_or(!self.is_closed);

        let address = self
            .location
            .map(|l| l.display_address.join(", "))
            .and_then(|a| non_blank(Some(a)));

        Some(Candidate {
            price_tier: self
                .price
                .as_deref()
                .map_or(PriceTier::UNKNOWN, PriceTier::from_symbols),
            address,
            phone: non_blank(self.display_phone).or_else(|| non_blank(self.phone)),
            website: non_blank(self.url),
            image_url: non_blank(self.image_url),
            rating: self.rating.unwrap_or(0.0).clamp(0.0, 5.0),
            review_count: self.review_count.unwrap_or(0),
            is_open_now,
            categories: self.categories.into_iter().map(|c| c.title).collect(),
            source: SOURCE_NAME.to_string(),
            ..Candidate::new(self.id, self.name.trim(), coordinate)
        })
    }
}
