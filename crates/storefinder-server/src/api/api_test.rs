use std::path::PathBuf;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use storefinder_core::{parse_store_dataset, Environment, RateLimitConfig, SearchConfig};
use tower::ServiceExt;

use super::*;

const DATASET: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [10.7522, 59.9139] },
            "properties": { "id": "1", "name": "Sentrum Bakeri", "city": "Oslo" }
        },
        {
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [5.3221, 60.3913] },
            "properties": { "id": 2, "name": "Sentrum", "isShoppingCenter": true, "storeCount": 40 }
        },
        {
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [10.7700, 59.9300] },
            "properties": { "id": "3", "name": "Kjøpesenter Øst", "isShoppingCenter": true }
        },
        { "type": "Feature", "geometry": { "type": "Point", "coordinates": [10.76, 59.92] } }
    ]
}"#;

fn test_state(max_requests: usize) -> AppState {
    let dataset = parse_store_dataset(DATASET).expect("dataset");
    AppState {
        dataset: Arc::new(dataset),
        config: Arc::new(AppConfig {
            env: Environment::Test,
            bind_addr: "127.0.0.1:0".parse().expect("addr"),
            search: SearchConfig {
                log_level: "debug".to_string(),
                dataset_path: PathBuf::from("unused.geojson"),
                default_result_limit: 8,
                max_result_limit: 50,
            },
            rate_limit: RateLimitConfig {
                max_requests,
                window: Duration::from_secs(60),
            },
        }),
    }
}

async fn send(app: Router, uri: &str, user_agent: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .header("user-agent", user_agent)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)";
const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0";

async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
    send(build_app(test_state(100)), uri, DESKTOP_UA).await
}

fn data_ids(json: &serde_json::Value) -> Vec<String> {
    json["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|item| item["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn error_codes_map_to_statuses() {
    let cases = [
        (ApiError::invalid("req-1".into(), "bad"), StatusCode::BAD_REQUEST),
        (ApiError::store_not_found("req-1".into(), "9"), StatusCode::NOT_FOUND),
        (ApiError::rate_limited("req-1".into()), StatusCode::TOO_MANY_REQUESTS),
    ];
    for (error, status) in cases {
        assert_eq!(error.into_response().status(), status);
    }
}

#[test]
fn error_codes_serialize_as_snake_case() {
    let json = serde_json::to_value(ApiError::invalid("req-1".into(), "bad")).expect("json");
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["meta"]["request_id"], "req-1");
    assert!(json["meta"].get("results").is_none());
}

#[tokio::test]
async fn health_reports_dataset_size() {
    let (status, json) = get_json("/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["stores"], 4);
    assert_eq!(json["data"]["skipped"], 0);
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn search_ranks_centers_first() {
    let (status, json) = get_json("/api/v1/stores/search?q=sentrum").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data_ids(&json), vec!["2", "1"]);
    assert_eq!(json["data"][0]["is_shopping_center"], true);
    assert_eq!(json["data"][0]["store_count"], 40);
    assert_eq!(json["meta"]["results"], 2);
}

#[tokio::test]
async fn search_reports_compact_layout_for_phones_and_narrow_viewports() {
    let app = build_app(test_state(100));
    let (_, phone) = send(app.clone(), "/api/v1/stores/search?q=sentrum", IPHONE_UA).await;
    assert_eq!(phone["meta"]["compact_layout"], true);

    let (_, wide) = send(app.clone(), "/api/v1/stores/search?q=sentrum", DESKTOP_UA).await;
    assert_eq!(wide["meta"]["compact_layout"], false);

    let (_, narrow) = send(app, "/api/v1/stores/search?q=sentrum&width=400", DESKTOP_UA).await;
    assert_eq!(narrow["meta"]["compact_layout"], true);
}

#[tokio::test]
async fn search_respects_limit() {
    let (status, json) = get_json("/api/v1/stores/search?q=sentrum&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data_ids(&json), vec!["2"]);
}

#[tokio::test]
async fn search_folds_diacritics() {
    let (status, json) = get_json("/api/v1/stores/search?q=ost").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data_ids(&json), vec!["3"]);
}

#[tokio::test]
async fn short_query_returns_empty_list() {
    let (status, json) = get_json("/api/v1/stores/search?q=s").await;
    assert_eq!(status, StatusCode::OK);
    assert!(data_ids(&json).is_empty());
}

#[tokio::test]
async fn search_without_query_is_validation_error() {
    let (status, json) = get_json("/api/v1/stores/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn in_view_filters_to_bounds() {
    let (status, json) =
        get_json("/api/v1/stores/in-view?west=10.6&south=59.8&east=10.9&north=60.0&zoom=12").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data_ids(&json), vec!["1", "3"]);
    assert!(json["data"][0]["longitude"].as_f64().is_some());
}

#[tokio::test]
async fn in_view_below_min_zoom_is_empty() {
    let (status, json) =
        get_json("/api/v1/stores/in-view?west=10.6&south=59.8&east=10.9&north=60.0&zoom=8").await;
    assert_eq!(status, StatusCode::OK);
    assert!(data_ids(&json).is_empty());
}

#[tokio::test]
async fn in_view_rejects_inverted_bounds() {
    let (status, json) =
        get_json("/api/v1/stores/in-view?west=11&south=59.8&east=10&north=60.0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn in_view_rejects_non_finite_zoom() {
    let (status, json) =
        get_json("/api/v1/stores/in-view?west=10.6&south=59.8&east=10.9&north=60.0&zoom=NaN").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn store_routes_use_configured_rate_limit() {
    let app = build_app(test_state(1));
    let (status, _) = send(app.clone(), "/api/v1/stores/1", DESKTOP_UA).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(app.clone(), "/api/v1/stores/1", DESKTOP_UA).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json["error"]["code"], "rate_limited");

    let (status, _) = send(app, "/api/v1/health", DESKTOP_UA).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn get_store_by_numeric_id() {
    let (status, json) = get_json("/api/v1/stores/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["name"], "Sentrum");
}

#[tokio::test]
async fn get_store_returns_404_for_unknown_id() {
    let (status, json) = get_json("/api/v1/stores/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}
