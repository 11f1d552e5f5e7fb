//! Route definitions for the `/cart` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::cart;
use crate::state::AppState;

/// Routes mounted at `/cart`. All require auth.
///
/// ```text
/// GET    /   -> list_cart
/// POST   /   -> add_to_cart
/// PUT    /   -> set_cart_quantity
/// DELETE /   -> remove_from_cart
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(cart::list_cart)
            .post(cart::add_to_cart)
            .put(cart::set_cart_quantity)
            .delete(cart::remove_from_cart),
    )
}
