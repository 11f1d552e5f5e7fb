pub mod auth;
pub mod cart;
pub mod health;
pub mod items;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                 register (public)
/// /auth/token                    obtain token pair (public)
/// /auth/token/refresh            rotate token pair (public)
/// /auth/logout                   revoke sessions (requires auth)
///
/// /items                         list (public), create (staff)
/// /items/{id}                    get (public), update, delete (staff)
///
/// /cart                          list, add, set, remove (requires auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/items", items::router())
        .nest("/cart", cart::router())
}
