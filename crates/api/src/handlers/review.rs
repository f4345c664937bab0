//! Handlers for the human review workflow.
//!
//! Listing and detail require any review-queue role; decisions require
//! the reviewer or admin role. Response bodies are the bare record or
//! array -- the record schema is the serialization contract consumed by
//! dashboards.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use riskgate_core::review::{DecisionRequest, ReviewRecord, ReviewStatus};
use riskgate_store::StoreError;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAnalyst, RequireReviewer};
use crate::state::AppState;

/// Query parameters for the review list endpoint.
#[derive(Debug, Deserialize)]
pub struct ReviewListParams {
    pub status: Option<String>,
}

/// GET /api/v1/reviews?status=<pending|approved|rejected>
///
/// List reviews in insertion order, optionally filtered by status.
pub async fn list_reviews(
    RequireAnalyst(_user): RequireAnalyst,
    State(state): State<AppState>,
    Query(params): Query<ReviewListParams>,
) -> AppResult<Json<Vec<ReviewRecord>>> {
    let status = params
        .status
        .as_deref()
        .map(ReviewStatus::from_str)
        .transpose()
        .map_err(AppError::Core)?;

    let reviews = state.reviews.get_reviews(status).await?;
    Ok(Json(reviews))
}

/// GET /api/v1/reviews/{review_id}
pub async fn get_review(
    RequireAnalyst(_user): RequireAnalyst,
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> AppResult<Json<ReviewRecord>> {
    let review = state
        .reviews
        .get_review(&review_id)
        .await?
        .ok_or_else(|| AppError::Store(StoreError::NotFound(review_id)))?;
    Ok(Json(review))
}

/// POST /api/v1/reviews/{review_id}/decision
///
/// Record an approve/reject decision. The store validates the status
/// value and rejects anything else before touching the record.
pub async fn decide_review(
    RequireReviewer(user): RequireReviewer,
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    Json(input): Json<DecisionRequest>,
) -> AppResult<Json<ReviewRecord>> {
    let updated = state
        .reviews
        .process_decision(&review_id, input, chrono::Utc::now())
        .await?;

    tracing::info!(
        user_id = %user.user_id,
        review_id = %updated.id,
        status = %updated.status,
        "Review decision recorded"
    );

    Ok(Json(updated))
}
