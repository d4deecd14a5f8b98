//! Fallback candidate source: Apple Maps Server API `/v1/search`.
//!
//! The search is a natural-language query bounded to a region around the
//! origin and filtered to points of interest. Apple supplies neither price nor
//! rating, so the price tier is inferred from the category and name.

use async_trait::async_trait;
use nearbite_core::{
    bounding_region, derive_candidate_id, Candidate, Coordinate, PriceTier, SearchQuery,
};
use reqwest::{Client, Url};
use serde::Deserialize;

use super::http::{build_client, endpoint, non_blank, parse_base_url, send_json};
use crate::error::SourceError;
use crate::source::CandidateSource;

const DEFAULT_BASE_URL: &str = "https://maps-api.apple.com";
const SEARCH_PATH: &str = "v1/search";
const SOURCE_NAME: &str = "apple_maps";

/// Client for the Apple Maps Server API search endpoint.
///
/// `access_token` is a maps access token (not the long-lived auth JWT).
pub struct AppleMapsSource {
    client: Client,
    access_token: String,
    search_url: Url,
}

impl AppleMapsSource {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SourceError> {
        Self::with_base_url(access_token, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the client cannot be constructed, or
    /// [`SourceError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, SourceError> {
        let client = build_client(timeout_secs, user_agent)?;
        let search_url = endpoint(&parse_base_url(base_url)?, SEARCH_PATH)?;
        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            search_url,
        })
    }

    fn query_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
        let region = bounding_region(query.origin, f64::from(query.radius_m));
        vec![
            ("q", query.term.clone()),
            (
                "searchLocation",
                format!("{},{}", query.origin.latitude, query.origin.longitude),
            ),
            (
                "searchRegion",
                format!(
                    "{:.6},{:.6},{:.6},{:.6}",
                    region.north, region.east, region.south, region.west
                ),
            ),
            ("resultTypeFilter", "Poi".to_string()),
            ("lang", "en-US".to_string()),
        ]
    }
}

#[async_trait]
impl CandidateSource for AppleMapsSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Candidate>, SourceError> {
        let request = self
            .client
            .get(self.search_url.clone())
            .bearer_auth(&self.access_token)
            .query(&Self::query_params(query));

        let context = format!(
            "apple maps search(origin={}, radius={})",
            query.origin, query.radius_m
        );
        let response: AppleSearchResponse = send_json(SOURCE_NAME, request, &context).await?;

        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        Ok(response
            .results
            .into_iter()
            .filter_map(ApplePlace::into_candidate)
            .take(limit)
            .collect())
    }
}

/// Heuristic price tier for providers that do not report one.
///
/// Bakeries and cafes are cheap, restaurants moderate, and anything unmatched
/// defaults to moderate.
#[must_use]
pub fn infer_price_tier(category: Option<&str>, name: &str) -> PriceTier {
    let haystack = format!(
        "{} {}",
        category.unwrap_or_default().to_lowercase(),
        name.to_lowercase()
    );
    if ["bakery", "cafe", "café", "coffee"]
        .iter()
        .any(|needle| haystack.contains(needle))
    {
        PriceTier::CHEAP
    } else {
        PriceTier::MODERATE
    }
}

#[derive(Debug, Deserialize)]
struct AppleSearchResponse {
    #[serde(default)]
    results: Vec<ApplePlace>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplePlace {
    #[serde(default)]
    id: Option<String>,
    name: String,
    coordinate: Option<AppleCoordinate>,
    #[serde(default)]
    formatted_address_lines: Vec<String>,
    #[serde(default)]
    poi_category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AppleCoordinate {
    latitude: f64,
    longitude: f64,
}

impl ApplePlace {
    fn into_candidate(self) -> Option<Candidate> {
        let coords = self.coordinate?;
        let coordinate = Coordinate::new(coords.latitude, coords.longitude);
        let name = self.name.trim().to_string();
        if name.is_empty() || !coordinate.is_valid() {
            return None;
        }

        let id = non_blank(self.id).unwrap_or_else(|| derive_candidate_id(&name, coordinate));
        let price_tier = infer_price_tier(self.poi_category.as_deref(), &name);
        let address = non_blank(Some(self.formatted_address_lines.join(", ")));

        Some(Candidate {
            price_tier,
            address,
            // Apple only reports places that are currently operating.
            is_open_now: true,
            categories: self.poi_category.into_iter().collect(),
            source: SOURCE_NAME.to_string(),
            ..Candidate::new(id, name, coordinate)
        })
    }
}
