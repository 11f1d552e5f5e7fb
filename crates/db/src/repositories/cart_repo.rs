//! Repository for the `cart_items` table.
//!
//! Every mutation is a single statement so it runs in its own implicit
//! transaction. Add-or-merge relies on `uq_cart_items_user_item`: concurrent
//! adds for the same (user, item) serialize on the unique index and the
//! loser takes the `DO UPDATE` branch, so no line is duplicated and no
//! increment is lost.

use shop_core::types::DbId;
use sqlx::PgPool;

use crate::models::cart::{CartLine, CartUpsert};

/// Columns selected from a `line` CTE joined to `items i`.
const LINE_COLUMNS: &str = "\
    line.id, line.user_id, line.quantity, line.added_at, \
    i.id AS item_id, i.name AS item_name, i.category AS item_category, \
    i.price AS item_price, i.image AS item_image, \
    i.created_at AS item_created_at, i.updated_at AS item_updated_at";

/// Provides the cart reconciliation operations, always scoped to one user.
pub struct CartRepo;

impl CartRepo {
    /// All lines in the user's cart with full item detail, oldest line first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<CartLine>, sqlx::Error> {
        let query = format!(
            "SELECT {LINE_COLUMNS}
             FROM cart_items line
             JOIN items i ON i.id = line.item_id
             WHERE line.user_id = $1
             ORDER BY line.id ASC"
        );
        sqlx::query_as::<_, CartLine>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find the user's line for one item.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        item_id: DbId,
    ) -> Result<Option<CartLine>, sqlx::Error> {
        let query = format!(
            "SELECT {LINE_COLUMNS}
             FROM cart_items line
             JOIN items i ON i.id = line.item_id
             WHERE line.user_id = $1 AND line.item_id = $2"
        );
        sqlx::query_as::<_, CartLine>(&query)
            .bind(user_id)
            .bind(item_id)
            .fetch_optional(pool)
            .await
    }

    /// Create the line with `quantity`, or add `quantity` to the existing one.
    ///
    /// Returns `None` when `item_id` does not reference an item; nothing is
    /// written in that case. `created` is true only when a new line was
    /// inserted (`xmax = 0` on the returned tuple).
    pub async fn add_or_merge(
        pool: &PgPool,
        user_id: DbId,
        item_id: DbId,
        quantity: i32,
    ) -> Result<Option<CartUpsert>, sqlx::Error> {
        let query = format!(
            "WITH line AS (
                 INSERT INTO cart_items (user_id, item_id, quantity)
                 SELECT $1, items.id, $3 FROM items WHERE items.id = $2
                 ON CONFLICT ON CONSTRAINT uq_cart_items_user_item
                 DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
                 RETURNING id, user_id, item_id, quantity, added_at, (xmax = 0) AS created
             )
             SELECT {LINE_COLUMNS}, line.created
             FROM line
             JOIN items i ON i.id = line.item_id"
        );
        sqlx::query_as::<_, CartUpsert>(&query)
            .bind(user_id)
            .bind(item_id)
            .bind(quantity)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the quantity of an existing line. Never creates a line.
    ///
    /// Returns `None` if the user has no line for `item_id`.
    pub async fn set_quantity(
        pool: &PgPool,
        user_id: DbId,
        item_id: DbId,
        quantity: i32,
    ) -> Result<Option<CartLine>, sqlx::Error> {
        let query = format!(
            "WITH line AS (
                 UPDATE cart_items SET quantity = $3
                 WHERE user_id = $1 AND item_id = $2
                 RETURNING id, user_id, item_id, quantity, added_at
             )
             SELECT {LINE_COLUMNS}
             FROM line
             JOIN items i ON i.id = line.item_id"
        );
        sqlx::query_as::<_, CartLine>(&query)
            .bind(user_id)
            .bind(item_id)
            .bind(quantity)
            .fetch_optional(pool)
            .await
    }

    /// Delete the user's line for `item_id`.
    ///
    /// Returns `true` if a line was deleted.
    pub async fn remove(pool: &PgPool, user_id: DbId, item_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND item_id = $2")
            .bind(user_id)
            .bind(item_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of lines in the user's cart.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
