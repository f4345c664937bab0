//! Route definitions for transaction analysis.
//!
//! The HITL interceptor is layered here so it wraps exactly the routes
//! that emit analysis payloads.

use axum::middleware::from_fn_with_state;
use axum::routing::post;
use axum::Router;

use crate::handlers::analyze;
use crate::middleware::hitl::hitl_middleware;
use crate::state::AppState;

/// Analysis routes, merged into `/analyze`.
///
/// ```text
/// POST   /transaction    analyze_transaction (HITL-intercepted)
/// ```
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/transaction", post(analyze::analyze_transaction))
        .layer(from_fn_with_state(state, hitl_middleware))
}
