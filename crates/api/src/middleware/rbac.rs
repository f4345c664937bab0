//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role
//! does not meet the requirement. Use these in route handlers to
//! enforce authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use riskgate_core::error::CoreError;
use riskgate_core::roles::{ROLE_ADMIN, ROLE_ANALYST, ROLE_REVIEWER};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires a role allowed to decide reviews: `admin` or `reviewer`.
/// Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn decide(RequireReviewer(user): RequireReviewer) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireReviewer(pub AuthUser);

impl FromRequestParts<AppState> for RequireReviewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN && user.role != ROLE_REVIEWER {
            return Err(AppError::Core(CoreError::Forbidden(
                "Reviewer or Admin role required".into(),
            )));
        }
        Ok(RequireReviewer(user))
    }
}

/// Requires a role allowed to read the review queue: `admin`,
/// `reviewer`, or `analyst`. Rejects with 403 Forbidden otherwise.
pub struct RequireAnalyst(pub AuthUser);

impl FromRequestParts<AppState> for RequireAnalyst {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN && user.role != ROLE_REVIEWER && user.role != ROLE_ANALYST {
            return Err(AppError::Core(CoreError::Forbidden(
                "Analyst, Reviewer or Admin role required".into(),
            )));
        }
        Ok(RequireAnalyst(user))
    }
}
