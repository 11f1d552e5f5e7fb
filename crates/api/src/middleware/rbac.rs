//! Role-based access control extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use shop_core::error::CoreError;
use shop_db::models::user::ROLE_STAFF;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `staff` role. Rejects with 403 Forbidden otherwise.
///
/// Catalog writes go through this; reads and cart operations only need
/// [`AuthUser`] or nothing at all.
///
/// ```ignore
/// async fn staff_only(RequireStaff(user): RequireStaff) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_STAFF {
            return Err(AppError::Core(CoreError::Forbidden(
                "Staff role required".into(),
            )));
        }
        Ok(RequireStaff(user))
    }
}
