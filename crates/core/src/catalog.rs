//! Catalog filter parsing and item field rules.
//!
//! The read path is lenient: optional filters that are blank or
//! cannot be parsed are dropped instead of rejecting the request. Item writes
//! (staff only) are validated strictly.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::error::CoreError;

/// Maximum length of an item name.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length of an item category.
pub const MAX_CATEGORY_LEN: usize = 100;

/// Largest price in cents that fits `NUMERIC(10, 2)`.
pub const MAX_PRICE_CENTS: i64 = 9_999_999_999;

/// Largest storable price (`99999999.99`).
pub fn max_price() -> Decimal {
    Decimal::new(MAX_PRICE_CENTS, 2)
}

// ---------------------------------------------------------------------------
// Query filters
// ---------------------------------------------------------------------------

/// Parsed, normalized catalog filters. Every field is optional and the
/// present ones are combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Case-insensitive substring matched against name OR category.
    pub q: Option<String>,
    /// Case-insensitive exact category match.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub price_min: Option<Decimal>,
    /// Inclusive upper price bound.
    pub price_max: Option<Decimal>,
}

impl ItemFilter {
    /// Build a filter from raw query-string values.
    ///
    /// Empty strings count as absent. Price bounds that are not numbers are
    /// ignored rather than reported.
    pub fn from_raw(
        q: Option<&str>,
        category: Option<&str>,
        price_min: Option<&str>,
        price_max: Option<&str>,
    ) -> Self {
        Self {
            q: non_empty(q),
            category: non_empty(category),
            price_min: price_min.and_then(parse_price_bound),
            price_max: price_max.and_then(parse_price_bound),
        }
    }

    /// True when no filter would be applied.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Parse a price bound, accepting plain decimals (`15`, `15.50`) and
/// scientific notation (`1.5e1`). Returns `None` for anything that is not a
/// number.
///
/// Numbers beyond `Decimal`'s range clamp to [`Decimal::MAX`] or
/// [`Decimal::MIN`] so the bound still applies: `price_min=1e30` matches
/// nothing.
pub fn parse_price_bound(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(exact) = Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
        return Some(exact);
    }
    let approx: f64 = trimmed.parse().ok()?;
    if approx.is_nan() {
        return None;
    }
    Decimal::from_f64(approx).or(Some(if approx.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }))
}

/// Escape `LIKE` metacharacters so user input only ever matches literally.
///
/// Uses backslash, PostgreSQL's default `LIKE` escape character.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build the `%term%` pattern used for substring search.
pub fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

// ---------------------------------------------------------------------------
// Item field rules
// ---------------------------------------------------------------------------

/// Validate an item name for create/update.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    validate_text("name", name, MAX_NAME_LEN)
}

/// Validate an item category for create/update.
pub fn validate_category(category: &str) -> Result<(), CoreError> {
    validate_text("category", category, MAX_CATEGORY_LEN)
}

fn validate_text(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Validate and normalize a price to two decimal places.
///
/// Prices must be non-negative, have at most two fractional digits, and fit
/// the storage column.
pub fn normalize_price(price: Decimal) -> Result<Decimal, CoreError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(CoreError::Validation("price must not be negative".into()));
    }
    if price.normalize().scale() > 2 {
        return Err(CoreError::Validation(
            "price must have at most 2 decimal places".into(),
        ));
    }
    let max = max_price();
    if price > max {
        return Err(CoreError::Validation(format!(
            "price must not exceed {max}"
        )));
    }
    let mut normalized = price.normalize();
    normalized.rescale(2);
    Ok(normalized)
}

/// Resolve a stored media path to an absolute URL.
///
/// `base_url` is the public origin (`https://shop.example.com`), `media_url`
/// the mount prefix (`/media/`). Slashes at the joins are collapsed.
pub fn absolute_media_url(base_url: &str, media_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let prefix = media_url.trim_matches('/');
    let path = path.trim_start_matches('/');
    if prefix.is_empty() {
        format!("{base}/{path}")
    } else {
        format!("{base}/{prefix}/{path}")
    }
}

/// Image formats accepted for item uploads, by lowercase file extension.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Lowercase extension of an uploaded image's file name, if it is one of
/// [`IMAGE_EXTENSIONS`].
pub fn image_extension(file_name: &str) -> Result<String, CoreError> {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(CoreError::Validation(format!(
            "Unsupported image type '{file_name}'. Supported: {}",
            IMAGE_EXTENSIONS.join(", ")
        )))
    }
}

/// Media path for an uploaded item image, relative to the media root.
/// `unique` distinguishes successive uploads for the same item.
pub fn item_image_path(item_id: i64, unique: &str, ext: &str) -> String {
    format!("items/item_{item_id}_{unique}.{ext}")
}
