//! Integration tests for `AppleMapsSource` using wiremock HTTP mocks.

use nearbite_core::{derive_candidate_id, Coordinate, PriceTier, SearchQuery};
use nearbite_search::{AppleMapsSource, CandidateSource, SourceError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_source(base_url: &str) -> AppleMapsSource {
    AppleMapsSource::with_base_url("maps-token", 5, "nearbite-test/0.1", base_url)
        .expect("source construction should not fail")
}

fn sf_query(limit: u32) -> SearchQuery {
    SearchQuery::new(Coordinate::new(37.7749, -122.4194), "restaurants", 5_000, limit)
}

#[tokio::test]
async fn search_maps_points_of_interest_with_inferred_price() {
    let server = MockServer::start().await;

    let body = json!({
        "results": [
            {
                "name": "Tartine Bakery",
                "coordinate": {"latitude": 37.7614, "longitude": -122.4241},
                "formattedAddressLines": ["600 Guerrero St", "San Francisco, CA 94110"],
                "poiCategory": "Bakery"
            },
            {
                "id": "I5A1F0E1B2C3D4E5",
                "name": "State Bird Provisions",
                "coordinate": {"latitude": 37.7837, "longitude": -122.4330},
                "poiCategory": "Restaurant"
            },
            {
                "name": "Unknown Spot",
                "coordinate": {"latitude": 37.7801, "longitude": -122.4101}
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(header("authorization", "Bearer maps-token"))
        .and(query_param("q", "restaurants"))
        .and(query_param("searchLocation", "37.7749,-122.4194"))
        .and(query_param("resultTypeFilter", "Poi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let results = test_source(&server.uri())
        .search(&sf_query(20))
        .await
        .expect("should parse");

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].price_tier, PriceTier::CHEAP);
    assert_eq!(
        results[0].id,
        derive_candidate_id("Tartine Bakery", Coordinate::new(37.7614, -122.4241))
    );
    assert_eq!(results[1].id, "I5A1F0E1B2C3D4E5");
    assert_eq!(results[1].price_tier, PriceTier::MODERATE);
    assert_eq!(results[2].price_tier, PriceTier::MODERATE, "unmatched defaults to moderate");
    assert!(results.iter().all(|c| c.source == "apple_maps"));
}

#[tokio::test]
async fn result_limit_is_applied_client_side() {
    let server = MockServer::start().await;

    let places: Vec<_> = (0..5)
        .map(|i| {
            json!({
                "name": format!("Place {i}"),
                "coordinate": {"latitude": 37.77 + f64::from(i) * 0.001, "longitude": -122.41}
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": places})))
        .mount(&server)
        .await;

    let results = test_source(&server.uri())
        .search(&sf_query(2))
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn missing_results_field_is_an_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let results = test_source(&server.uri())
        .search(&sf_query(20))
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn forbidden_maps_to_not_authorized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = test_source(&server.uri())
        .search(&sf_query(20))
        .await
        .unwrap_err();
    assert!(
        matches!(err, SourceError::NotAuthorized { status: 403, source_name: "apple_maps" }),
        "got {err:?}"
    );
}
