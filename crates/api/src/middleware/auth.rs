//! Bearer-token authentication.
//!
//! A token is only as good as the account behind it: the extractor reloads
//! the user on every request, so deleted or deactivated accounts lose access
//! immediately instead of when their token expires.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use shop_core::error::CoreError;
use shop_core::types::DbId;
use shop_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// The caller behind a valid `Authorization: Bearer <token>` header.
///
/// Cart operations are scoped to `user_id`. `role` reflects the account as
/// stored now, not as it was when the token was issued.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// `"staff"` or `"customer"`.
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> AppResult<Self> {
        let token = bearer_token(parts)?;
        let claims = state
            .config
            .jwt
            .verify(token)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .filter(|user| user.is_active)
            .ok_or_else(|| unauthorized("User not found or inactive"))?;

        Ok(AuthUser {
            user_id: user.id,
            role: user.role().to_string(),
        })
    }
}

/// Pull the raw token out of the `Authorization` header.
fn bearer_token(parts: &Parts) -> AppResult<&str> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| unauthorized("Malformed Authorization header"))?;

    match header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            Ok(token.trim())
        }
        _ => Err(unauthorized("Expected: Authorization: Bearer <token>")),
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.to_string()))
}
