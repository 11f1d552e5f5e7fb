//! Repository for the `items` table.
//!
//! The catalog query is the only dynamic SQL in the crate. Filter values are
//! always bound, never interpolated.

use rust_decimal::Decimal;
use shop_core::catalog::{contains_pattern, ItemFilter};
use shop_core::types::DbId;
use sqlx::PgPool;

use crate::models::item::{CreateItem, Item, UpdateItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, category, price, image, created_at, updated_at";

/// Provides catalog reads and staff-side item writes.
pub struct ItemRepo;

impl ItemRepo {
    /// Return the items matching every present filter, ordered by id.
    pub async fn query(pool: &PgPool, filter: &ItemFilter) -> Result<Vec<Item>, sqlx::Error> {
        let (where_clause, bind_values) = build_item_filter(filter);
        let query = format!("SELECT {COLUMNS} FROM items {where_clause} ORDER BY id ASC");

        bind_item_values(sqlx::query_as::<_, Item>(&query), &bind_values)
            .fetch_all(pool)
            .await
    }

    /// Find an item by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new item, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateItem) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items (name, category, price, image)
             VALUES ($1, $2, $3, NULLIF($4, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(&input.name)
            .bind(&input.category)
            .bind(input.price)
            .bind(&input.image)
            .fetch_one(pool)
            .await
    }

    /// Update an item. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateItem,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                price = COALESCE($4, price),
                image = CASE WHEN $5::TEXT IS NULL THEN image ELSE NULLIF($5, '') END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.category)
            .bind(input.price)
            .bind(&input.image)
            .fetch_optional(pool)
            .await
    }

    /// Delete an item. Cart lines referencing it are removed by cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Filter building
// ---------------------------------------------------------------------------

/// Typed bind value for the dynamically-built catalog query.
enum BindValue {
    Text(String),
    Price(Decimal),
}

/// Build a WHERE clause and bind values from the present filters.
///
/// The clause is empty when no filter is active, otherwise starts with `WHERE `.
fn build_item_filter(filter: &ItemFilter) -> (String, Vec<BindValue>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(ref q) = filter.q {
        conditions.push(format!(
            "(name ILIKE ${bind_idx} OR category ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
        bind_values.push(BindValue::Text(contains_pattern(q)));
    }

    if let Some(ref category) = filter.category {
        conditions.push(format!("LOWER(category) = LOWER(${bind_idx})"));
        bind_idx += 1;
        bind_values.push(BindValue::Text(category.clone()));
    }

    if let Some(min) = filter.price_min {
        conditions.push(format!("price >= ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Price(min));
    }

    if let Some(max) = filter.price_max {
        conditions.push(format!("price <= ${bind_idx}"));
        bind_values.push(BindValue::Price(max));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values)
}

fn bind_item_values<'q>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, Item, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, Item, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Price(v) => q = q.bind(*v),
        }
    }
    q
}
