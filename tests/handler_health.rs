mod common;

use axum::http::StatusCode;
use axum::{Router, routing::get};
use axum_test::TestServer;
use shortly::api::handlers::{health_handler, healthz_handler};

#[tokio::test]
async fn test_health_endpoint_success() {
    let (state, _store) = common::create_test_state();
    let app = Router::new()
        .route("/", get(health_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let response = server.get("/").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["redis"], "connected");
    assert_eq!(json["store"], "connected");
    assert_eq!(json["state"], "connected");
    assert_eq!(json["domain"], "short.ly");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn test_health_endpoint_store_unavailable() {
    let app = Router::new()
        .route("/", get(health_handler))
        .with_state(common::create_unavailable_state());

    let server = TestServer::new(app).unwrap();

    let response = server.get("/").await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["redis"], "disconnected");
    assert_eq!(json["store"], "unavailable");
    assert_eq!(json["state"], "disconnected");
    assert!(json["error"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn test_healthz() {
    let (app, _store) = common::create_test_app();
    let server = TestServer::new(app).unwrap();

    let response = server.get("/healthz").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_healthz_store_unavailable() {
    let app = Router::new()
        .route("/healthz", get(healthz_handler))
        .with_state(common::create_unavailable_state());

    let server = TestServer::new(app).unwrap();

    let response = server.get("/healthz").await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.text(), "Store unavailable");
}
