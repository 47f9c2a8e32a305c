//! Bearer-token guard for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde_json::Value;

use crate::error::{AppError, GuardRejection};
use crate::services::jwt::JwtService;
use crate::state::AppState;

/// Caller authenticated by a JWT in the `Authorization: Bearer` header.
///
/// Use this as an extractor parameter in any handler that requires a token:
///
/// ```ignore
/// async fn profile(user: AuthUser) -> AppResult<ApiResponse<Value>> {
///     Ok(ApiResponse::ok("Profile", user.claims))
/// }
/// ```
///
/// A missing or malformed header is a 404, a token that does not verify is
/// a 403.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The verified token payload.
    pub claims: Value,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let jwt = JwtService::new(&state.config.jwt)?;
        let claims = jwt
            .verify(token)
            .map_err(|e| GuardRejection::AccessDenied(e.to_string()))?;

        Ok(AuthUser { claims })
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, GuardRejection> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(GuardRejection::MissingToken)?;

    let token = match header.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(' ') => rest.trim(),
        _ => return Err(GuardRejection::MissingToken),
    };

    if token.is_empty() {
        return Err(GuardRejection::EmptyToken);
    }
    Ok(token)
}
