//! Route definitions for the review workflow.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::review;
use crate::state::AppState;

/// Review routes, merged into `/reviews`.
///
/// ```text
/// GET    /                          list_reviews
/// GET    /{review_id}               get_review
/// POST   /{review_id}/decision      decide_review
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(review::list_reviews))
        .route("/{review_id}", get(review::get_review))
        .route("/{review_id}/decision", post(review::decide_review))
}
