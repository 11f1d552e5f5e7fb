//! Catalog item model and DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shop_core::catalog::ItemFilter;
use shop_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `items` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub name: String,
    pub category: String,
    /// Always two decimal places; serialized as a string (`"20.00"`).
    pub price: Decimal,
    /// Media path relative to the media root, e.g. `items/mug.png`.
    pub image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub image: Option<String>,
}

/// DTO for updating an item. All fields are optional; an empty `image`
/// clears the stored image.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
}

/// Raw query parameters for `GET /items`.
///
/// Kept as strings so malformed numbers reach [`ItemFilter::from_raw`] and
/// are dropped there instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemQueryParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
}

impl ItemQueryParams {
    pub fn to_filter(&self) -> ItemFilter {
        ItemFilter::from_raw(
            self.q.as_deref(),
            self.category.as_deref(),
            self.price_min.as_deref(),
            self.price_max.as_deref(),
        )
    }
}
