//! Shared helpers for HTTP-level integration tests.
//!
//! Uses Axum's `tower::ServiceExt` to send requests directly to the
//! router without an actual TCP listener. The router is built through
//! the same [`build_app_router`] the binary uses, so tests exercise the
//! full middleware stack (CORS, request ID, timeout, tracing, panic
//! recovery, HITL interception) on top of the in-memory review store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use riskgate_api::analyzer::OfflineAnalyzer;
use riskgate_api::auth::jwt::{generate_access_token, JwtConfig};
use riskgate_api::config::{ServerConfig, StoreBackend};
use riskgate_api::router::build_app_router;
use riskgate_api::state::AppState;
use riskgate_store::ReviewStore;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        review_create_timeout_ms: 2000,
        store: StoreBackend::Memory,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router backed by a fresh in-memory store.
pub fn build_test_app() -> Router {
    let config = test_config();
    let state = AppState {
        reviews: ReviewStore::in_memory(),
        analyzer: Arc::new(OfflineAnalyzer),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Mint an access token for the given role.
pub fn token(role: &str) -> String {
    generate_access_token(&format!("test-user-{role}"), role, &test_config().jwt)
        .expect("token generation")
}

/// Send a GET request with a Bearer token.
pub async fn get(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request without any Authorization header.
pub async fn get_unauthenticated(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and a Bearer token.
pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and no Authorization header.
pub async fn post_json_unauthenticated(
    app: Router,
    uri: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into parsed JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A transaction body that trips the large-amount and suspicious-keyword
/// predicates regardless of analyzer jitter. The pinned afternoon
/// timestamp keeps the unusual-hours heuristic quiet.
pub fn flagged_transaction() -> serde_json::Value {
    serde_json::json!({
        "amount": 15000,
        "merchant": "Suspicious Casino",
        "location": "Offshore",
        "timestamp": "2026-03-10T14:30:00Z"
    })
}

/// A transaction body no predicate fires on.
pub fn benign_transaction() -> serde_json::Value {
    serde_json::json!({
        "amount": 100,
        "merchant": "Grocery Store",
        "location": "Local",
        "timestamp": "2026-03-10T14:30:00Z"
    })
}

/// Run a flagged transaction through the analyze endpoint and return
/// the created review id.
pub async fn create_review_via_analyze(app: Router) -> String {
    let response = post_json(
        app,
        "/api/v1/analyze/transaction",
        &token("analyst"),
        flagged_transaction(),
    )
    .await;
    let json = body_json(response).await;
    json["reviewId"]
        .as_str()
        .expect("analyze response carries a reviewId")
        .to_string()
}
