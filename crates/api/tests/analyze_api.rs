//! Tests for the transaction analysis endpoint and its validation.

mod common;

use axum::http::StatusCode;
use common::{benign_transaction, body_json, build_test_app, post_json, token};

#[tokio::test]
async fn test_analysis_response_shape() {
    let app = build_test_app();
    let response = post_json(
        app,
        "/api/v1/analyze/transaction",
        &token("analyst"),
        benign_transaction(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let score = json["riskScore"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&score));
    assert!(["Low", "Medium", "High"].contains(&json["riskLevel"].as_str().unwrap()));
    assert!(json["isHighRisk"].is_boolean());
    assert!(json["explanation"].is_string());
    assert_eq!(json["factors"].as_array().unwrap().len(), 3);
    assert!(!json["recommendations"].as_array().unwrap().is_empty());
    assert!(json["transactionId"].as_str().unwrap().starts_with("txn_"));
}

#[tokio::test]
async fn test_supplied_transaction_id_is_echoed() {
    let app = build_test_app();
    let mut body = benign_transaction();
    body["transactionId"] = serde_json::json!("txn_mine");

    let response = post_json(app, "/api/v1/analyze/transaction", &token("analyst"), body).await;
    let json = body_json(response).await;
    assert_eq!(json["transactionId"], "txn_mine");
}

#[tokio::test]
async fn test_missing_merchant_returns_400() {
    let app = build_test_app();
    let response = post_json(
        app,
        "/api/v1/analyze/transaction",
        &token("analyst"),
        serde_json::json!({ "amount": 100 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "Missing required fields: amount and merchant are required"
    );
}

#[tokio::test]
async fn test_missing_amount_returns_400() {
    let app = build_test_app();
    let response = post_json(
        app,
        "/api/v1/analyze/transaction",
        &token("analyst"),
        serde_json::json!({ "merchant": "Grocery Store" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_positive_amount_returns_400() {
    let app = build_test_app();
    let response = post_json(
        app,
        "/api/v1/analyze/transaction",
        &token("analyst"),
        serde_json::json!({ "amount": 0, "merchant": "Grocery Store" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validation_failure_creates_no_review() {
    let app = build_test_app();
    post_json(
        app.clone(),
        "/api/v1/analyze/transaction",
        &token("analyst"),
        serde_json::json!({ "amount": 100 }),
    )
    .await;

    let response = common::get(app, "/api/v1/reviews", &token("admin")).await;
    let json = body_json(response).await;
    assert!(json.as_array().unwrap().is_empty());
}
