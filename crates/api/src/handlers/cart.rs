//! Handlers for the `/cart` resource.
//!
//! Every operation is scoped to the authenticated caller. The handlers parse
//! and validate input, then hand a plain user id to [`CartRepo`].

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use shop_core::cart::{
    parse_item_id, quantity_or_default, require_item_id, require_quantity, LooseInt,
};
use shop_core::error::CoreError;
use shop_core::types::{DbId, Timestamp};
use shop_db::models::cart::CartLine;
use shop_db::repositories::CartRepo;

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::handlers::items::ItemResponse;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for `POST /cart` and `PUT /cart`.
///
/// Both fields accept a JSON number or a numeric string. `quantity` defaults
/// to 1 on add and is required on set.
#[derive(Debug, Default, Deserialize)]
pub struct CartItemInput {
    pub item_id: Option<LooseInt>,
    pub quantity: Option<LooseInt>,
}

/// Query string for `DELETE /cart`.
#[derive(Debug, Default, Deserialize)]
pub struct RemoveQuery {
    pub item_id: Option<String>,
}

/// A cart line as returned by the API.
#[derive(Debug, Serialize)]
pub struct CartLineResponse {
    pub id: DbId,
    pub item: ItemResponse,
    pub quantity: i32,
    pub added_at: Timestamp,
}

impl CartLineResponse {
    pub fn from_line(line: CartLine, config: &ServerConfig) -> Self {
        Self {
            id: line.id,
            item: ItemResponse::from_item(line.item, config),
            quantity: line.quantity,
            added_at: line.added_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/cart
///
/// All lines in the caller's cart, oldest first.
pub async fn list_cart(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let lines = CartRepo::list_for_user(&state.pool, user.user_id).await?;

    let data: Vec<CartLineResponse> = lines
        .into_iter()
        .map(|line| CartLineResponse::from_line(line, &state.config))
        .collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/cart
///
/// Add `quantity` (default 1) of an item. Merges into an existing line by
/// summing quantities. Returns 201 for a new line, 200 for a merge.
pub async fn add_to_cart(
    user: AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CartItemInput>,
) -> AppResult<impl IntoResponse> {
    let item_id = require_item_id(input.item_id.as_ref())?;
    let quantity = quantity_or_default(input.quantity.as_ref())?;

    let upsert = CartRepo::add_or_merge(&state.pool, user.user_id, item_id, quantity)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        }))?;

    tracing::info!(
        user_id = user.user_id,
        item_id,
        quantity,
        total = upsert.line.quantity,
        created = upsert.created,
        "Cart line added",
    );

    let status = if upsert.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(DataResponse {
            data: CartLineResponse::from_line(upsert.line, &state.config),
        }),
    ))
}

/// PUT /api/v1/cart
///
/// Overwrite the quantity of an existing line. Never creates one.
pub async fn set_cart_quantity(
    user: AuthUser,
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CartItemInput>,
) -> AppResult<impl IntoResponse> {
    let item_id = require_item_id(input.item_id.as_ref())?;
    let quantity = require_quantity(input.quantity.as_ref())?;

    let line = CartRepo::set_quantity(&state.pool, user.user_id, item_id, quantity)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Cart line for item",
            id: item_id,
        }))?;

    tracing::info!(user_id = user.user_id, item_id, quantity, "Cart line quantity set");

    Ok(Json(DataResponse {
        data: CartLineResponse::from_line(line, &state.config),
    }))
}

/// DELETE /api/v1/cart
///
/// Remove the caller's line for an item. `item_id` is read from the query
/// string, falling back to a JSON body.
pub async fn remove_from_cart(
    user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<RemoveQuery>,
    body: Bytes,
) -> AppResult<StatusCode> {
    let item_id = removal_item_id(query.item_id.as_deref(), &body)?;

    if !CartRepo::remove(&state.pool, user.user_id, item_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Cart line for item",
            id: item_id,
        }));
    }

    tracing::info!(user_id = user.user_id, item_id, "Cart line removed");

    Ok(StatusCode::NO_CONTENT)
}

/// Resolve the item id for a removal. A non-empty query value wins.
fn removal_item_id(query: Option<&str>, body: &[u8]) -> Result<DbId, AppError> {
    if let Some(raw) = query.filter(|raw| !raw.is_empty()) {
        return Ok(parse_item_id(raw)?);
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(require_item_id(None)?);
    }
    let input: CartItemInput = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;
    Ok(require_item_id(input.item_id.as_ref())?)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn removal_prefers_query_value() {
        let id = removal_item_id(Some("5"), br#"{"item_id": 9}"#).unwrap();
        assert_eq!(id, 5);
    }

    #[test]
    fn removal_falls_back_to_body() {
        assert_eq!(removal_item_id(None, br#"{"item_id": 9}"#).unwrap(), 9);
        assert_eq!(removal_item_id(Some(""), br#"{"item_id": "3"}"#).unwrap(), 3);
    }

    #[test]
    fn removal_without_item_id_is_a_validation_error() {
        assert_matches!(
            removal_item_id(None, b""),
            Err(AppError::Core(CoreError::Validation(_)))
        );
        assert_matches!(
            removal_item_id(None, b"{}"),
            Err(AppError::Core(CoreError::Validation(_)))
        );
        assert_matches!(
            removal_item_id(Some("abc"), b""),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }

    #[test]
    fn removal_with_garbage_body_is_a_bad_request() {
        assert_matches!(
            removal_item_id(None, b"not json"),
            Err(AppError::BadRequest(_))
        );
    }
}
