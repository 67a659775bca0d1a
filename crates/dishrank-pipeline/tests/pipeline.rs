//! End-to-end pipeline tests against wiremock providers: resolution with
//! fuzzy fallback, fan-out extraction with partial failures, deterministic
//! aggregation, and cache behavior.

use std::time::Duration;

use dishrank_extract::ExtractClient;
use dishrank_pipeline::{PipelineError, PopularDishes};
use dishrank_places::PlacesClient;
use dishrank_core::Query;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pipeline(places_url: &str, extract_url: &str, ttl: Duration) -> PopularDishes {
    let places =
        PlacesClient::with_base_url("places-key", 30, places_url).expect("places client");
    let extract = ExtractClient::with_base_url("extract-key", "test-model", 30, extract_url)
        .expect("extract client");
    PopularDishes::new(places, extract, ttl, 4, 10)
}

fn candidate_json(place_id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "place_id": place_id,
        "name": name,
        "formatted_address": "Koreatown, Los Angeles, CA",
        "rating": 4.4,
        "user_ratings_total": 1500,
        "price_level": 2,
        "types": ["restaurant"]
    })
}

fn review_json(author: &str, text: &str, time: i64) -> serde_json::Value {
    serde_json::json!({
        "author_name": author,
        "rating": 5,
        "text": text,
        "time": time
    })
}

fn model_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
}

/// Mounts an extraction mock that answers with `mentions_json` for any
/// request whose prompt contains `marker`.
async fn mount_extraction(server: &MockServer, marker: &str, mentions_json: &str) {
    Mock::given(method("POST"))
        .and(path("/v1beta/models/test-model:generateContent"))
        .and(body_string_contains(marker))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_response(mentions_json)))
        .mount(server)
        .await;
}

async fn requests_to(server: &MockServer, wanted: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == wanted)
        .count()
}

#[tokio::test]
async fn end_to_end_resolution_extraction_aggregation_and_cache() {
    let places = MockServer::start().await;
    let extract = MockServer::start().await;

    // Exact lookup is ambiguous: two candidates.
    Mock::given(method("GET"))
        .and(path("/place/findplacefromtext/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "candidates": [
                candidate_json("ChIJ1", "BCD Tofu House"),
                candidate_json("ChIJ2", "Sokongdong Tofu House")
            ]
        })))
        .mount(&places)
        .await;

    // Fuzzy fallback returns three ranked candidates.
    Mock::given(method("GET"))
        .and(path("/place/textsearch/json"))
        .and(query_param("query", "tofu house koreatown"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [
                candidate_json("ChIJ1", "BCD Tofu House"),
                candidate_json("ChIJ2", "Sokongdong Tofu House"),
                candidate_json("ChIJ3", "Beverly Tofu House")
            ]
        })))
        .mount(&places)
        .await;

    // Details for the selected candidate: four reviews.
    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .and(query_param("place_id", "ChIJ2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "result": {
                "place_id": "ChIJ2",
                "name": "Sokongdong Tofu House",
                "formatted_address": "2716 W Olympic Blvd, Los Angeles, CA",
                "rating": 4.4,
                "reviews": [
                    review_json("Alice", "The Soondubu here is life changing.", 1),
                    review_json("Bob", "Tried the soondubu again, still great.", 2),
                    review_json("Carol", "Kimchi was just okay for me.", 3),
                    review_json("Dan", "Parking was easy on a Tuesday.", 4)
                ]
            }
        })))
        .mount(&places)
        .await;

    mount_extraction(
        &extract,
        "life changing",
        r#"[{"dish": "Soondubu", "sentiment": 0.9, "quote": "life changing"}]"#,
    )
    .await;
    mount_extraction(
        &extract,
        "still great",
        r#"[{"dish": "soondubu", "sentiment": 0.7, "quote": "still great"}]"#,
    )
    .await;
    mount_extraction(
        &extract,
        "just okay",
        r#"[{"dish": "Kimchi", "sentiment": 0.4, "quote": "just okay"}]"#,
    )
    .await;
    mount_extraction(&extract, "Parking was easy", "[]").await;

    let pipeline = pipeline(&places.uri(), &extract.uri(), Duration::from_secs(60));

    // Resolution: ambiguous exact lookup falls back to fuzzy search.
    let query = Query::new("tofu house").with_near("koreatown");
    let candidates = pipeline.resolve_query(&query).await.unwrap();
    assert_eq!(candidates.len(), 3);

    // Caller selects candidate #2.
    let selected = &candidates[1];
    assert_eq!(selected.place_id, "ChIJ2");

    let result = pipeline.get_popular_items(&selected.place_id).await.unwrap();
    assert_eq!(result.place_id, "ChIJ2");
    assert_eq!(result.dishes.len(), 2);

    assert_eq!(result.dishes[0].name, "Soondubu");
    assert_eq!(result.dishes[0].mention_count, 2);
    assert!((result.dishes[0].avg_sentiment - 0.8).abs() < 1e-9);

    assert_eq!(result.dishes[1].name, "Kimchi");
    assert_eq!(result.dishes[1].mention_count, 1);
    assert!((result.dishes[1].avg_sentiment - 0.4).abs() < 1e-9);

    // Second call is served from cache: no further provider traffic.
    let details_before = requests_to(&places, "/place/details/json").await;
    let extractions_before = requests_to(&extract, "/v1beta/models/test-model:generateContent").await;
    assert_eq!(details_before, 1);
    assert_eq!(extractions_before, 4);

    let cached = pipeline.get_popular_items("ChIJ2").await.unwrap();
    assert_eq!(cached.computed_at, result.computed_at);
    assert_eq!(cached.dishes, result.dishes);
    assert_eq!(requests_to(&places, "/place/details/json").await, 1);
    assert_eq!(
        requests_to(&extract, "/v1beta/models/test-model:generateContent").await,
        4
    );
}

#[tokio::test]
async fn exact_match_short_circuits_text_search() {
    let places = MockServer::start().await;
    let extract = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/findplacefromtext/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "candidates": [candidate_json("ChIJsnd", "Sun Nong Dan")]
        })))
        .mount(&places)
        .await;

    let pipeline = pipeline(&places.uri(), &extract.uri(), Duration::from_secs(60));
    let candidates = pipeline
        .resolve_query(&Query::new("Sun Nong Dan 3463 W 6th St"))
        .await
        .unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].place_id, "ChIJsnd");
    assert_eq!(requests_to(&places, "/place/textsearch/json").await, 0);
}

#[tokio::test]
async fn no_match_from_both_stages_is_empty_not_error() {
    let places = MockServer::start().await;
    let extract = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/findplacefromtext/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ZERO_RESULTS",
            "candidates": []
        })))
        .mount(&places)
        .await;
    Mock::given(method("GET"))
        .and(path("/place/textsearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ZERO_RESULTS",
            "results": []
        })))
        .mount(&places)
        .await;

    let pipeline = pipeline(&places.uri(), &extract.uri(), Duration::from_secs(60));
    let candidates = pipeline
        .resolve_query(&Query::new("restaurant that does not exist anywhere"))
        .await
        .unwrap();
    assert!(candidates.is_empty());
}

#[tokio::test]
async fn empty_query_fails_fast_without_provider_call() {
    let places = MockServer::start().await;
    let extract = MockServer::start().await;

    let pipeline = pipeline(&places.uri(), &extract.uri(), Duration::from_secs(60));
    let err = pipeline
        .resolve_query(&Query::new("   "))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::InvalidQuery));
    assert!(places.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn partial_extraction_failure_uses_surviving_reviews() {
    let places = MockServer::start().await;
    let extract = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "result": {
                "place_id": "ChIJ5rev",
                "name": "Pho Corner",
                "formatted_address": "1 Main St",
                "reviews": [
                    review_json("A", "Pho broth deep and rich here.", 1),
                    review_json("B", "This review breaks the extractor alpha.", 2),
                    review_json("C", "Best pho noodles in the valley.", 3),
                    review_json("D", "This review breaks the extractor beta.", 4),
                    review_json("E", "Spring rolls crisp and fresh.", 5)
                ]
            }
        })))
        .mount(&places)
        .await;

    mount_extraction(
        &extract,
        "broth deep and rich",
        r#"[{"dish": "Pho", "sentiment": 0.9, "quote": "broth deep and rich"}]"#,
    )
    .await;
    mount_extraction(
        &extract,
        "noodles in the valley",
        r#"[{"dish": "pho", "sentiment": 0.8, "quote": "best pho noodles"}]"#,
    )
    .await;
    mount_extraction(
        &extract,
        "crisp and fresh",
        r#"[{"dish": "Spring Rolls", "sentiment": 0.85, "quote": "crisp and fresh"}]"#,
    )
    .await;
    // Two reviews hit a broken extractor.
    Mock::given(method("POST"))
        .and(path("/v1beta/models/test-model:generateContent"))
        .and(body_string_contains("breaks the extractor"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&extract)
        .await;

    let pipeline = pipeline(&places.uri(), &extract.uri(), Duration::from_secs(60));
    let result = pipeline.get_popular_items("ChIJ5rev").await.unwrap();

    assert_eq!(result.dishes.len(), 2);
    assert_eq!(result.dishes[0].name, "Pho");
    assert_eq!(result.dishes[0].mention_count, 2);
    assert_eq!(result.dishes[1].name, "Spring Rolls");
    assert_eq!(result.dishes[1].mention_count, 1);
}

#[tokio::test]
async fn all_extractions_failing_yields_empty_result_not_error() {
    let places = MockServer::start().await;
    let extract = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "result": {
                "place_id": "ChIJdark",
                "name": "Outage Bistro",
                "formatted_address": "2 Main St",
                "reviews": [
                    review_json("A", "Nice place overall.", 1),
                    review_json("B", "Would come back.", 2)
                ]
            }
        })))
        .mount(&places)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/test-model:generateContent"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&extract)
        .await;

    let pipeline = pipeline(&places.uri(), &extract.uri(), Duration::from_secs(60));
    let result = pipeline.get_popular_items("ChIJdark").await.unwrap();
    assert!(result.dishes.is_empty());
}

#[tokio::test]
async fn venue_without_reviews_yields_empty_result() {
    let places = MockServer::start().await;
    let extract = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "result": {
                "place_id": "ChIJquiet",
                "name": "New Spot",
                "formatted_address": "3 Main St",
                "reviews": []
            }
        })))
        .mount(&places)
        .await;

    let pipeline = pipeline(&places.uri(), &extract.uri(), Duration::from_secs(60));
    let result = pipeline.get_popular_items("ChIJquiet").await.unwrap();
    assert!(result.dishes.is_empty());
    // No review corpus means no extraction traffic at all.
    assert!(extract.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn stale_place_id_is_venue_not_found() {
    let places = MockServer::start().await;
    let extract = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "NOT_FOUND"
        })))
        .mount(&places)
        .await;

    let pipeline = pipeline(&places.uri(), &extract.uri(), Duration::from_secs(60));
    let err = pipeline.get_popular_items("ChIJstale").await.unwrap_err();
    assert!(
        matches!(err, PipelineError::VenueNotFound { ref place_id } if place_id == "ChIJstale"),
        "expected VenueNotFound, got {err:?}"
    );
}

#[tokio::test]
async fn provider_fault_during_fetch_is_provider_unavailable() {
    let places = MockServer::start().await;
    let extract = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&places)
        .await;

    let pipeline = pipeline(&places.uri(), &extract.uri(), Duration::from_secs(60));
    let err = pipeline.get_popular_items("ChIJany").await.unwrap_err();
    assert!(
        matches!(err, PipelineError::ProviderUnavailable { .. }),
        "expected ProviderUnavailable, got {err:?}"
    );
}

#[tokio::test]
async fn zero_ttl_recomputes_on_every_call() {
    let places = MockServer::start().await;
    let extract = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/place/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "result": {
                "place_id": "ChIJttl",
                "name": "Ephemeral Eats",
                "formatted_address": "4 Main St",
                "reviews": [review_json("A", "Great bulgogi fries.", 1)]
            }
        })))
        .mount(&places)
        .await;

    mount_extraction(
        &extract,
        "bulgogi fries",
        r#"[{"dish": "Bulgogi Fries", "sentiment": 0.9, "quote": "great bulgogi fries"}]"#,
    )
    .await;

    let pipeline = pipeline(&places.uri(), &extract.uri(), Duration::ZERO);
    pipeline.get_popular_items("ChIJttl").await.unwrap();
    pipeline.get_popular_items("ChIJttl").await.unwrap();

    assert_eq!(requests_to(&places, "/place/details/json").await, 2);
}
