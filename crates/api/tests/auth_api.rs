//! Authentication and role-check tests for the review API.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_review_via_analyze, get, get_unauthenticated, post_json,
    post_json_unauthenticated, token,
};

#[tokio::test]
async fn test_list_requires_authentication() {
    let app = build_test_app();
    let response = get_unauthenticated(app, "/api/v1/reviews").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_analyze_requires_authentication() {
    let app = build_test_app();
    let response = post_json_unauthenticated(
        app,
        "/api/v1/analyze/transaction",
        common::benign_transaction(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let app = build_test_app();
    let response = get(app, "/api/v1/reviews", "not-a-real-token").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_all_queue_roles_can_list() {
    for role in ["admin", "reviewer", "analyst"] {
        let app = build_test_app();
        let response = get(app, "/api/v1/reviews", &token(role)).await;
        assert_eq!(response.status(), StatusCode::OK, "role {role}");
    }
}

#[tokio::test]
async fn test_unknown_role_cannot_list() {
    let app = build_test_app();
    let response = get(app, "/api/v1/reviews", &token("intern")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_analyst_cannot_decide() {
    let app = build_test_app();
    let review_id = create_review_via_analyze(app.clone()).await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/reviews/{review_id}/decision"),
        &token("analyst"),
        serde_json::json!({ "status": "approved", "reviewerId": "analyst-1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The record is untouched.
    let response = get(
        app,
        &format!("/api/v1/reviews/{review_id}"),
        &token("analyst"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["status"], "pending");
}

#[tokio::test]
async fn test_admin_can_decide() {
    let app = build_test_app();
    let review_id = create_review_via_analyze(app.clone()).await;

    let response = post_json(
        app,
        &format!("/api/v1/reviews/{review_id}/decision"),
        &token("admin"),
        serde_json::json!({ "status": "rejected", "reviewerId": "admin-1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "rejected");
}
