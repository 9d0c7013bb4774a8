//! Integration tests for `OverpassClient`.
//!
//! Each test stands up a local `wiremock` server in place of the public
//! interpreter. Retries use `NoDelay` so backoff does not slow the suite.

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fuel_finder::domain::{Coordinate, Radius};
use fuel_finder::overpass::{
    ElementFilter, ElementSource, NoDelay, OverpassClient, OverpassConfig, OverpassError,
    QueryBuilder, RetryPolicy,
};

fn test_client(server: &MockServer, retry: RetryPolicy) -> OverpassClient<NoDelay> {
    let config = OverpassConfig::new(format!("{}/api/interpreter", server.uri()))
        .with_timeout(5)
        .with_retry(retry);
    OverpassClient::new(config)
        .expect("failed to build test client")
        .with_delay(NoDelay)
}

fn fuel_query() -> fuel_finder::overpass::OverpassQuery {
    let center = Coordinate::new(33.6844, 73.0479).unwrap();
    QueryBuilder::default().build(center, Radius::meters(1000.0).unwrap(), ElementFilter::Fuel)
}

fn one_station() -> serde_json::Value {
    json!({
        "version": 0.6,
        "elements": [{
            "type": "node",
            "id": 1,
            "lat": 33.6844,
            "lon": 73.0479,
            "tags": {"amenity": "fuel", "name": "PSO Station", "brand": "PSO"}
        }]
    })
}

#[tokio::test]
async fn posts_query_text_and_parses_elements() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .and(header("content-type", "text/plain"))
        .and(body_string_contains(r#"node["amenity"="fuel"](around:1000,33.684400,73.047900);"#))
        .and(body_string_contains("out center;"))
        .respond_with(ResponseTemplate::new(200).set_body_json(one_station()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, RetryPolicy::default());
    let elements = client.fetch(&fuel_query()).await.expect("fetch should succeed");

    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].tags.get("name"), Some("PSO Station"));
}

#[tokio::test]
async fn missing_elements_key_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": 0.6})))
        .mount(&server)
        .await;

    let client = test_client(&server, RetryPolicy::default());
    let elements = client.fetch(&fuel_query()).await.unwrap();
    assert!(elements.is_empty());
}

#[tokio::test]
async fn retries_transient_failures_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(one_station()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, RetryPolicy::default());
    let elements = client.fetch(&fuel_query()).await.expect("third attempt succeeds");
    assert_eq!(elements.len(), 1);
}

#[tokio::test]
async fn gives_up_after_max_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server, RetryPolicy::default());
    let err = client.fetch(&fuel_query()).await.unwrap_err();

    match err {
        OverpassError::RetriesExhausted { attempts, last } => {
            assert_eq!(attempts, 3);
            assert!(matches!(*last, OverpassError::Api { status: 429, .. }));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("parse error: line 1"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, RetryPolicy::default());
    let err = client.fetch(&fuel_query()).await.unwrap_err();

    match err {
        OverpassError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "parse error: line 1");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, RetryPolicy::default());
    let err = client.fetch(&fuel_query()).await.unwrap_err();

    match err {
        OverpassError::Malformed { body, .. } => {
            assert_eq!(body.as_deref(), Some("<html>maintenance</html>"));
        }
        other => panic!("expected Malformed, got {other:?}"),
    }
}

#[tokio::test]
async fn error_body_excerpt_is_truncated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("x".repeat(2000)))
        .mount(&server)
        .await;

    let client = test_client(&server, RetryPolicy::no_retries());
    let err = client.fetch(&fuel_query()).await.unwrap_err();

    match err {
        OverpassError::Api { message, .. } => assert_eq!(message.len(), 500),
        other => panic!("expected Api error, got {other:?}"),
    }
}
