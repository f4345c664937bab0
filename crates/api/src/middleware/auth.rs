//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use riskgate_core::error::CoreError;

use crate::auth::jwt::{validate_token, Claims};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller extracted from a JWT Bearer token.
///
/// Handlers that only need *a* caller take this directly; handlers with
/// a role requirement use the wrappers in [`super::rbac`] instead.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The caller's identity provider id (from `claims.sub`).
    pub user_id: String,
    /// The caller's role name (e.g. `"admin"`, `"reviewer"`, `"analyst"`).
    pub role: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role,
        }
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.to_string()))
}

/// Pull the bearer token out of the `Authorization` header, if any.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        validate_token(token, &state.config.jwt)
            .map(AuthUser::from)
            .map_err(|_| unauthorized("Invalid or expired token"))
    }
}
