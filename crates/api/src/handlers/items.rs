//! Handlers for the `/items` resource.
//!
//! Listing and detail are public. Writes require the staff role.

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;
use shop_core::catalog::{
    absolute_media_url, image_extension, item_image_path, normalize_price, validate_category,
    validate_name,
};
use shop_core::error::CoreError;
use shop_core::types::DbId;
use shop_db::models::item::{CreateItem, Item, ItemQueryParams, UpdateItem};
use shop_db::repositories::ItemRepo;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// Catalog item as returned by the API.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: DbId,
    pub name: String,
    pub category: String,
    /// Serialized as a two-decimal string, e.g. `"20.00"`.
    pub price: Decimal,
    /// Stored media path, relative to the media root.
    pub image: Option<String>,
    /// Absolute URL of `image`, or `null` when there is none.
    pub image_url: Option<String>,
}

impl ItemResponse {
    pub fn from_item(item: Item, config: &ServerConfig) -> Self {
        let image_url = item
            .image
            .as_deref()
            .map(|path| absolute_media_url(&config.public_base_url, &config.media_url, path));
        Self {
            id: item.id,
            name: item.name,
            category: item.category,
            price: item.price,
            image: item.image,
            image_url,
        }
    }
}

// ---------------------------------------------------------------------------
// Public reads
// ---------------------------------------------------------------------------

/// GET /api/v1/items
///
/// List items matching the optional `q`, `category`, `price_min` and
/// `price_max` filters. Unparseable bounds are ignored.
pub async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<ItemQueryParams>,
) -> AppResult<impl IntoResponse> {
    let filter = params.to_filter();
    let items = ItemRepo::query(&state.pool, &filter).await?;

    if !filter.is_empty() {
        tracing::debug!(?filter, count = items.len(), "Filtered catalog query");
    }

    let data: Vec<ItemResponse> = items
        .into_iter()
        .map(|item| ItemResponse::from_item(item, &state.config))
        .collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = ItemRepo::find_by_id(&state.pool, item_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        }))?;

    Ok(Json(DataResponse {
        data: ItemResponse::from_item(item, &state.config),
    }))
}

// ---------------------------------------------------------------------------
// Staff writes
// ---------------------------------------------------------------------------

/// POST /api/v1/items
pub async fn create_item(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    ApiJson(mut input): ApiJson<CreateItem>,
) -> AppResult<impl IntoResponse> {
    validate_name(&input.name)?;
    validate_category(&input.category)?;
    input.price = normalize_price(input.price)?;

    let item = ItemRepo::create(&state.pool, &input).await?;

    tracing::info!(
        item_id = item.id,
        name = %item.name,
        user_id = staff.user_id,
        "Item created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ItemResponse::from_item(item, &state.config),
        }),
    ))
}

/// PUT /api/v1/items/{id}
///
/// Partially update an item. An empty `image` clears it.
pub async fn update_item(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
    ApiJson(mut input): ApiJson<UpdateItem>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    if let Some(category) = &input.category {
        validate_category(category)?;
    }
    input.price = input.price.map(normalize_price).transpose()?;

    let item = ItemRepo::update(&state.pool, item_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        }))?;

    tracing::info!(item_id, user_id = staff.user_id, "Item updated");

    Ok(Json(DataResponse {
        data: ItemResponse::from_item(item, &state.config),
    }))
}

/// POST /api/v1/items/{id}/image
///
/// Store a multipart `image` field under the media root and point the item
/// at it. Other fields are ignored.
pub async fn upload_item_image(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<impl IntoResponse> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        })
    };
    if ItemRepo::find_by_id(&state.pool, item_id).await?.is_none() {
        return Err(not_found());
    }

    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        upload = Some((file_name, field.bytes().await?));
    }

    let (file_name, data) = upload
        .ok_or_else(|| AppError::Core(CoreError::Validation("image file is required".into())))?;
    if data.is_empty() {
        return Err(AppError::Core(CoreError::Validation("image file is empty".into())));
    }
    let ext = image_extension(&file_name)?;

    let media_path = item_image_path(item_id, &Uuid::new_v4().simple().to_string(), &ext);
    let target = state.config.media_root.join(&media_path);
    if let Some(dir) = target.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::InternalError(format!("Create {}: {e}", dir.display())))?;
    }
    tokio::fs::write(&target, &data)
        .await
        .map_err(|e| AppError::InternalError(format!("Write {}: {e}", target.display())))?;

    let update = UpdateItem {
        image: Some(media_path.clone()),
        ..UpdateItem::default()
    };
    let Some(item) = ItemRepo::update(&state.pool, item_id, &update).await? else {
        // Deleted between the existence check and the update.
        let _ = tokio::fs::remove_file(&target).await;
        return Err(not_found());
    };

    tracing::info!(
        item_id,
        user_id = staff.user_id,
        path = %media_path,
        bytes = data.len(),
        "Item image uploaded",
    );

    Ok(Json(DataResponse {
        data: ItemResponse::from_item(item, &state.config),
    }))
}

/// DELETE /api/v1/items/{id}
///
/// Cart lines holding the item disappear with it.
pub async fn delete_item(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ItemRepo::delete(&state.pool, item_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        }));
    }

    tracing::info!(item_id, user_id = staff.user_id, "Item deleted");

    Ok(StatusCode::NO_CONTENT)
}
