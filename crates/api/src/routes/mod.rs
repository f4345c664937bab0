pub mod analyze;
pub mod health;
pub mod review;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /analyze/transaction          analyze + HITL interception (POST)
///
/// /reviews                      list reviews (GET)
/// /reviews/{review_id}          review detail (GET)
/// /reviews/{review_id}/decision submit decision (POST)
/// ```
///
/// `state` is threaded in so the HITL interceptor can be attached to
/// the analyze routes as a scoped middleware layer.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/analyze", analyze::router(state))
        .nest("/reviews", review::router())
}
