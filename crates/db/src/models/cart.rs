//! Cart line models.

use shop_core::types::{DbId, Timestamp};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use super::item::Item;

/// A cart line joined with the item it references.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub id: DbId,
    pub user_id: DbId,
    pub quantity: i32,
    /// Set once on insert; merges and absolute sets never touch it.
    pub added_at: Timestamp,
    pub item: Item,
}

impl<'r> FromRow<'r, PgRow> for CartLine {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            quantity: row.try_get("quantity")?,
            added_at: row.try_get("added_at")?,
            item: Item {
                id: row.try_get("item_id")?,
                name: row.try_get("item_name")?,
                category: row.try_get("item_category")?,
                price: row.try_get("item_price")?,
                image: row.try_get("item_image")?,
                created_at: row.try_get("item_created_at")?,
                updated_at: row.try_get("item_updated_at")?,
            },
        })
    }
}

/// Result of an add-or-merge: the resulting line and whether it was new.
#[derive(Debug, Clone, PartialEq)]
pub struct CartUpsert {
    pub line: CartLine,
    pub created: bool,
}

impl<'r> FromRow<'r, PgRow> for CartUpsert {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            line: CartLine::from_row(row)?,
            created: row.try_get("created")?,
        })
    }
}
