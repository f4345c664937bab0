//! Human-in-the-loop response interceptor.
//!
//! An explicit middleware stage over the analyze routes: it inspects
//! each outgoing analysis payload, runs the trigger evaluator, creates
//! a review record when escalation is required, and merges the review
//! metadata into the response before it is delivered.
//!
//! Two invariants hold no matter what:
//!
//! 1. The augmentation completes before the response is flushed; there
//!    is no follow-up push.
//! 2. A review-store failure (or timeout) never fails the parent
//!    request -- the analysis is delivered annotated with `reviewError`.

use axum::body::{to_bytes, Body};
use axum::extract::{OriginalUri, Request, State};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::response::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

use riskgate_core::analysis::RiskAnalysis;
use riskgate_core::review::{ReviewRecord, ReviewStatus};
use riskgate_core::transaction::Transaction;
use riskgate_core::trigger;
use riskgate_core::types::Timestamp;

use crate::error::AppError;
use crate::state::AppState;

/// Upper bound on buffered request/response bodies.
const BODY_LIMIT: usize = 1024 * 1024;

/// Intercept analyze responses and attach review metadata.
///
/// `OriginalUri` is used for the path check because nested routers see
/// a prefix-stripped URI.
pub async fn hitl_middleware(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    req: Request,
    next: Next,
) -> Response {
    // Buffer the request body so the transaction snapshot survives the
    // inner handler consuming it.
    let (req_parts, req_body) = req.into_parts();
    let req_bytes = match to_bytes(req_body, BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(err) => {
            return AppError::BadRequest(format!("Failed to read request body: {err}"))
                .into_response()
        }
    };
    let path = uri.path().to_owned();
    let req = Request::from_parts(req_parts, Body::from(req_bytes.clone()));

    let response = next.run(req).await;

    // Only analysis payloads are augmented.
    if !path.contains("/analyze") || !response.status().is_success() || !is_json(&response) {
        return response;
    }

    let (res_parts, res_body) = response.into_parts();
    let res_bytes = match to_bytes(res_body, BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(error = %err, "Failed to buffer analysis response");
            return AppError::InternalError("Failed to buffer analysis response".into())
                .into_response();
        }
    };

    let mut payload: Value = match serde_json::from_slice(&res_bytes) {
        Ok(value) => value,
        Err(_) => return rebuild(res_parts, res_bytes.to_vec()),
    };
    if payload.get("riskScore").is_none() {
        return rebuild(res_parts, res_bytes.to_vec());
    }

    let now = chrono::Utc::now();
    augment_analysis(&state, &req_bytes, &mut payload, now).await;

    match serde_json::to_vec(&payload) {
        Ok(bytes) => rebuild(res_parts, bytes),
        Err(err) => {
            tracing::error!(error = %err, "Failed to re-serialize augmented analysis");
            rebuild(res_parts, res_bytes.to_vec())
        }
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Reassemble a response around a replacement body.
///
/// The stale `Content-Length` is dropped so the transport recomputes it
/// for the new body.
fn rebuild(mut parts: Parts, bytes: Vec<u8>) -> Response {
    parts.headers.remove(CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(bytes))
}

/// Evaluate the analysis and merge review metadata into the payload.
async fn augment_analysis(state: &AppState, req_bytes: &[u8], payload: &mut Value, now: Timestamp) {
    let Ok(analysis) = serde_json::from_value::<RiskAnalysis>(payload.clone()) else {
        // `riskScore` was present but the payload is not a full
        // analysis; leave it alone rather than guess.
        return;
    };
    let transaction = transaction_snapshot(req_bytes);

    let Some(fields) = payload.as_object_mut() else {
        return;
    };

    if !trigger::requires_review(&transaction, &analysis, now) {
        fields.insert("requiresHumanReview".into(), json!(false));
        fields.insert("reviewStatus".into(), json!("not_required"));
        return;
    }

    let reason = trigger::review_reason(&transaction, &analysis, now);
    let transaction_id = analysis.transaction_id.clone();
    let record = ReviewRecord::new(transaction_id.clone(), transaction, analysis, reason, now);

    let create = state.reviews.create_review(record);
    let timeout = std::time::Duration::from_millis(state.config.review_create_timeout_ms);
    let created = match tokio::time::timeout(timeout, create).await {
        Ok(Ok(review_id)) => Some(review_id),
        Ok(Err(err)) => {
            tracing::error!(error = %err, %transaction_id, "Failed to create review record");
            None
        }
        Err(_) => {
            tracing::error!(%transaction_id, "Review creation timed out");
            None
        }
    };

    match created {
        Some(review_id) => {
            tracing::info!(
                %transaction_id,
                %review_id,
                reason = %reason,
                "Transaction flagged for human review"
            );
            fields.insert("requiresHumanReview".into(), json!(true));
            fields.insert("reviewId".into(), json!(review_id));
            fields.insert(
                "reviewStatus".into(),
                json!(ReviewStatus::Pending.as_str()),
            );
            fields.insert("reviewReason".into(), json!(reason.as_str()));
            fields.insert(
                "reviewReasonDescription".into(),
                json!(reason.description()),
            );
            fields.insert("reviewedBy".into(), Value::Null);
            fields.insert("reviewedAt".into(), Value::Null);
            fields.insert("reviewComments".into(), Value::Null);
        }
        None => {
            // Deliver the analysis anyway; the caller learns the review
            // subsystem misbehaved without losing the result.
            fields.insert(
                "reviewError".into(),
                json!("Failed to create review record"),
            );
        }
    }
}

/// Parse the transaction snapshot from the buffered request body.
///
/// A malformed body must not fail evaluation; it degrades to a neutral
/// transaction so the analysis-driven predicates still apply.
fn transaction_snapshot(req_bytes: &[u8]) -> Transaction {
    serde_json::from_slice(req_bytes).unwrap_or(Transaction {
        transaction_id: None,
        amount: 0.0,
        merchant: String::new(),
        location: None,
        description: None,
        timestamp: None,
    })
}
