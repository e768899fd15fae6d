use std::path::PathBuf;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use lotview_core::{CsvLocation, Environment, SourceMode, VehicleRecord};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn test_config(source_mode: SourceMode, api_url: Option<String>, csv: CsvLocation) -> AppConfig {
    AppConfig {
        env: Environment::Test,
        bind_addr: "127.0.0.1:0".parse().expect("socket addr"),
        log_level: "info".to_string(),
        source_mode,
        api_url,
        csv_source: csv,
        refresh_url: None,
        refresh_secret: None,
        dealer_name: "Northside Motors".to_string(),
        request_timeout_secs: 5,
        user_agent: "lotview-test/0.1".to_string(),
        max_retries: 0,
        retry_backoff_base_secs: 0,
    }
}

fn vehicles() -> Vec<VehicleRecord> {
    let mut camry = VehicleRecord::new("Toyota", 2022, "Camry");
    camry.stock_number = Some("RDT-102".to_string());
    camry.list_price = Some(Decimal::from(35_000));
    camry.sale_price = Some(Decimal::from(32_500));

    let mut civic = VehicleRecord::new("Honda", 2021, "Civic");
    civic.stock_number = Some("H-7".to_string());
    civic.list_price = Some(Decimal::from(24_000));

    let mut corolla = VehicleRecord::new("Toyota", 2020, "Corolla");
    corolla.list_price = Some(Decimal::from(18_500));

    vec![corolla, camry, civic]
}

fn app_with(vehicles: Vec<VehicleRecord>, config: AppConfig) -> (Router, AppState) {
    let snapshot = InventorySnapshot::new(vehicles, SourceKind::Csv, Vec::new());
    let client = InventoryClient::from_config(&config).expect("client");
    let state = AppState::new(snapshot, client, config);
    (build_app(state.clone()), state)
}

fn test_app() -> Router {
    let csv = CsvLocation::Path(PathBuf::from("/nonexistent/lotview/inventory.csv"));
    app_with(vehicles(), test_config(SourceMode::Csv, None, csv)).0
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, body.to_vec())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).expect("json parse"))
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn keys(json: &Value) -> Vec<String> {
    json["data"]
        .as_array()
        .expect("data array")
        .iter()
        .map(|v| v["key"].as_str().expect("key").to_string())
        .collect()
}

#[test]
fn api_error_maps_codes_to_status() {
    let cases = [
        ("not_found", StatusCode::NOT_FOUND),
        ("validation_error", StatusCode::BAD_REQUEST),
        ("bad_request", StatusCode::BAD_REQUEST),
        ("source_unavailable", StatusCode::BAD_GATEWAY),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, status) in cases {
        let response = ApiError::new("req-1", code, "message").into_response();
        assert_eq!(response.status(), status, "code {code}");
    }
}

#[tokio::test]
async fn health_reports_snapshot_state() {
    let (status, json) = get_json(test_app(), "/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["vehicles"], 3);
    assert_eq!(json["data"]["source"], "csv");
    assert!(json["meta"]["request_id"].is_string());
}

#[tokio::test]
async fn health_reports_empty_inventory() {
    let csv = CsvLocation::Path(PathBuf::from("/nonexistent/lotview/inventory.csv"));
    let (app, _) = app_with(Vec::new(), test_config(SourceMode::Csv, None, csv));
    let (_, json) = get_json(app, "/api/v1/health").await;
    assert_eq!(json["data"]["status"], "empty");
    assert_eq!(json["data"]["vehicles"], 0);
}

#[tokio::test]
async fn request_id_is_echoed() {
    let request = Request::builder()
        .uri("/api/v1/health")
        .header("x-request-id", "req-abc")
        .body(Body::empty())
        .expect("request");
    let response = test_app().oneshot(request).await.expect("response");
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("req-abc")
    );
}

#[tokio::test]
async fn list_defaults_to_year_desc() {
    let (status, json) = get_json(test_app(), "/api/v1/vehicles").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(keys(&json), vec!["RDT-102", "H-7", "0"]);
}

#[tokio::test]
async fn list_includes_derived_pricing() {
    let (_, json) = get_json(test_app(), "/api/v1/vehicles?search=rdt-102").await;
    let item = &json["data"][0];
    assert_eq!(item["make"], "Toyota");
    assert_eq!(item["has_discount"], true);
    assert_eq!(item["effective_price"], "32500");
    assert_eq!(item["savings"], "2500");
}

#[tokio::test]
async fn list_applies_filters_and_sort() {
    let (_, json) = get_json(test_app(), "/api/v1/vehicles?make=Toyota&sort=price-asc").await;
    assert_eq!(keys(&json), vec!["0", "RDT-102"]);

    let (_, json) = get_json(test_app(), "/api/v1/vehicles?price_range=under-30k&sort=year-asc").await;
    assert_eq!(keys(&json), vec!["0", "H-7"]);
}

#[tokio::test]
async fn list_treats_empty_params_as_unset() {
    let (status, json) = get_json(
        test_app(),
        "/api/v1/vehicles?search=&make=&year=&fuel_type=&price_range=&sort=",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(keys(&json).len(), 3);
}

#[tokio::test]
async fn list_trims_exact_filter_params() {
    let (status, json) = get_json(
        test_app(),
        "/api/v1/vehicles?year=2022%20&make=%20Toyota&fuel_type=Gasoline%20&sort=%20",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(keys(&json), vec!["RDT-102"]);
}

#[tokio::test]
async fn list_rejects_unknown_price_range() {
    let (status, json) = get_json(test_app(), "/api/v1/vehicles?price_range=cheap").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn list_rejects_unknown_sort() {
    let (status, _) = get_json(test_app(), "/api/v1/vehicles?sort=color").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn facets_summarize_inventory() {
    let (status, json) = get_json(test_app(), "/api/v1/vehicles/facets").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["makes"], json!(["Honda", "Toyota"]));
    assert_eq!(json["data"]["years"], json!([2022, 2021, 2020]));
    assert_eq!(json["data"]["on_sale"], 1);
}

#[tokio::test]
async fn get_vehicle_by_stock_number_and_position() {
    let (status, json) = get_json(test_app(), "/api/v1/vehicles/H-7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["model"], "Civic");

    let (status, json) = get_json(test_app(), "/api/v1/vehicles/0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["model"], "Corolla");
}

#[tokio::test]
async fn get_vehicle_not_found() {
    let (status, json) = get_json(test_app(), "/api/v1/vehicles/NOPE-1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn poster_is_html_with_dealer_name() {
    let request = Request::builder()
        .uri("/api/v1/vehicles/RDT-102/poster")
        .body(Body::empty())
        .expect("request");
    let response = test_app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let html = String::from_utf8(body.to_vec()).expect("utf8");
    assert!(html.contains("Northside Motors"));
    assert!(html.contains("SALE PRICE"));
    assert!(html.contains("Stock #RDT-102"));
}

#[tokio::test]
async fn poster_for_unknown_key_is_not_found() {
    let (status, _) = get_json(test_app(), "/api/v1/vehicles/NOPE-1/poster").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reload_swaps_in_new_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "vehicles": [
                { "makeName": "Mazda", "year": 2023, "model": "CX-50", "stock_number": "MZ-1" },
                { "makeName": "", "year": 2023, "model": "Ghost" }
            ]
        })))
        .mount(&server)
        .await;

    let config = test_config(
        SourceMode::Live,
        Some(format!("{}/api/scrape", server.uri())),
        CsvLocation::Path(PathBuf::from("/nonexistent/lotview/inventory.csv")),
    );
    let (app, state) = app_with(vehicles(), config);

    let (status, body) = send(app.clone(), post("/api/v1/inventory/reload")).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).expect("json parse");
    assert_eq!(json["data"]["vehicles"], 1);
    assert_eq!(json["data"]["source"], "api");
    assert_eq!(json["data"]["skipped"].as_array().map(Vec::len), Some(1));

    assert_eq!(state.snapshot().await.len(), 1);
    let (_, json) = get_json(app, "/api/v1/vehicles").await;
    assert_eq!(keys(&json), vec!["MZ-1"]);
}

#[tokio::test]
async fn reload_failure_keeps_previous_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/scrape"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = test_config(
        SourceMode::Live,
        Some(format!("{}/api/scrape", server.uri())),
        CsvLocation::Path(PathBuf::from("/nonexistent/lotview/inventory.csv")),
    );
    let (app, state) = app_with(vehicles(), config);

    let (status, body) = send(app, post("/api/v1/inventory/reload")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let json: Value = serde_json::from_slice(&body).expect("json parse");
    assert_eq!(json["error"]["code"], "source_unavailable");
    assert!(json["error"]["message"]
        .as_str()
        .is_some_and(|m| m.contains("both sources failed")));

    assert_eq!(state.snapshot().await.len(), 3);
}

#[tokio::test]
async fn reload_failure_in_production_hides_source_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/scrape"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut config = test_config(
        SourceMode::Live,
        Some(format!("{}/api/scrape", server.uri())),
        CsvLocation::Path(PathBuf::from("/nonexistent/lotview/inventory.csv")),
    );
    config.env = Environment::Production;
    let (app, _) = app_with(vehicles(), config);

    let (status, body) = send(app, post("/api/v1/inventory/reload")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let json: Value = serde_json::from_slice(&body).expect("json parse");
    assert_eq!(json["error"]["message"], "inventory sources are unavailable");
}
