//! Route definitions for the `/items` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::items;
use crate::state::AppState;

/// Routes mounted at `/items`.
///
/// ```text
/// GET    /       -> list_items
/// POST   /       -> create_item (staff)
/// GET    /{id}   -> get_item
/// PUT    /{id}   -> update_item (staff)
/// DELETE /{id}   -> delete_item (staff)
/// POST   /{id}/image -> upload_item_image (staff, multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(items::list_items).post(items::create_item))
        .route(
            "/{id}",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
        .route("/{id}/image", post(items::upload_item_image))
}
