//! Caption → geocode → save against stubbed upstream services, wired from config

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use httpmock::prelude::*;
use matjip_server::build_state;
use matjip_server::config::ServerConfig;
use matjip_server::handlers::{
    create_router, GeocodeResponse, ParseReelResponse, PlacesResponse, SavePlaceResponse,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt; // for oneshot

async fn post_json(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn test_full_flow_with_configured_providers() {
    let anthropic = MockServer::start();
    let kakao = MockServer::start();
    let nominatim = MockServer::start();
    let dir = TempDir::new().unwrap();

    let llm_mock = anthropic.mock(|when, then| {
        when.method(POST)
            .path("/v1/messages")
            .header("x-api-key", "sk-test")
            .header("anthropic-version", "2023-06-01");
        then.status(200).json_body(json!({
            "content": [{
                "type": "text",
                "text": "{\"name\": \"Joe's Pizza\", \"address\": \"7 Carmine St, New York\", \"category\": \"fast-food\"}"
            }]
        }));
    });
    let kakao_mock = kakao.mock(|when, then| {
        when.method(GET).path("/v2/local/search/address.json");
        then.status(200).json_body(json!({"documents": []}));
    });
    let nominatim_mock = nominatim.mock(|when, then| {
        when.method(GET)
            .path("/search")
            .query_param("q", "7 Carmine St, New York");
        then.status(200)
            .json_body(json!([{"lat": "40.7306", "lon": "-74.0021"}]));
    });

    let mut config = ServerConfig::default();
    config.database_path = dir.path().join("places.db").display().to_string();
    config.llm.api_key = "sk-test".to_string();
    config.llm.endpoint = Some(anthropic.base_url());
    config.geocoder.kakao.api_key = "kakao-test".to_string();
    config.geocoder.kakao.endpoint = kakao.base_url();
    config.geocoder.nominatim.endpoint = nominatim.base_url();

    let app = create_router(build_state(&config).unwrap());

    let (status, body) = post_json(
        app.clone(),
        "/api/parse-reel",
        json!({"caption": "Best slice in the Village 🍕 Joe's Pizza, 7 Carmine St"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let parsed: ParseReelResponse = serde_json::from_slice(&body).unwrap();
    llm_mock.assert();

    let (status, body) = post_json(
        app.clone(),
        "/api/geocode",
        json!({"address": &parsed.data.address}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let geocoded: GeocodeResponse = serde_json::from_slice(&body).unwrap();
    kakao_mock.assert();
    nominatim_mock.assert();

    let (status, body) = post_json(
        app.clone(),
        "/api/save-place",
        json!({
            "name": &parsed.data.name,
            "address": &parsed.data.address,
            "category": &parsed.data.category,
            "latitude": geocoded.lat,
            "longitude": geocoded.lng,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let saved: SavePlaceResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(saved.data.name, "Joe's Pizza");
    assert_eq!(saved.data.category.map(|c| c.as_str()), Some("fast_food"));
    assert_eq!(saved.data.latitude, Some(40.7306));

    let request = Request::builder()
        .uri("/api/places")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let listed: PlacesResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(listed.count, 1);
    assert_eq!(listed.data[0].id, saved.data.id);
}
