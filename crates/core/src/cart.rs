//! Cart input rules.
//!
//! A cart holds at most one line per (user, item). Quantities are positive
//! integers with no cap other than the storage type; the repository layer
//! enforces uniqueness atomically, this module only validates what callers
//! send in.

use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::CoreError;
use crate::types::DbId;

/// Quantity used when an add request omits one.
pub const DEFAULT_QUANTITY: i32 = 1;

/// Smallest quantity a cart line may hold.
pub const MIN_QUANTITY: i32 = 1;

/// An integer field as clients actually send it: a JSON number, or a string
/// holding one (form posts and query strings).
///
/// Deserialization never fails. Any other JSON type lands in
/// [`LooseInt::Unsupported`] so the caller reports it as a validation error
/// naming the field.
#[derive(Debug, Clone, PartialEq)]
pub enum LooseInt {
    Int(i64),
    Float(f64),
    Text(String),
    /// A bool, array or object.
    Unsupported,
}

impl LooseInt {
    /// Resolve to an `i64`, naming `field` in the error on failure.
    ///
    /// Floats are accepted only when they hold a whole number.
    pub fn to_i64(&self, field: &str) -> Result<i64, CoreError> {
        let invalid = || CoreError::Validation(format!("{field} must be an integer"));
        match self {
            LooseInt::Int(n) => Ok(*n),
            LooseInt::Float(f) => {
                if f.fract() == 0.0 && f.is_finite() && f.abs() < i64::MAX as f64 {
                    Ok(*f as i64)
                } else {
                    Err(invalid())
                }
            }
            LooseInt::Text(s) => s.trim().parse::<i64>().map_err(|_| invalid()),
            LooseInt::Unsupported => Err(invalid()),
        }
    }
}

impl<'de> Deserialize<'de> for LooseInt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LooseIntVisitor)
    }
}

struct LooseIntVisitor;

impl<'de> Visitor<'de> for LooseIntVisitor {
    type Value = LooseInt;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an integer or a numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<LooseInt, E> {
        Ok(LooseInt::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<LooseInt, E> {
        Ok(i64::try_from(v).map_or(LooseInt::Float(v as f64), LooseInt::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<LooseInt, E> {
        Ok(LooseInt::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<LooseInt, E> {
        Ok(LooseInt::Text(v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<LooseInt, E> {
        Ok(LooseInt::Unsupported)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<LooseInt, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(LooseInt::Unsupported)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<LooseInt, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(LooseInt::Unsupported)
    }
}

/// Require a positive item identifier.
///
/// Absence and malformed values are both validation errors, kept distinct
/// from "no such line" which the caller reports as not found.
pub fn require_item_id(raw: Option<&LooseInt>) -> Result<DbId, CoreError> {
    let raw = raw.ok_or_else(|| CoreError::Validation("item_id is required".into()))?;
    let id = raw
        .to_i64("item_id")
        .map_err(|_| CoreError::Validation("item_id must be a positive integer".into()))?;
    if id < 1 {
        return Err(CoreError::Validation(
            "item_id must be a positive integer".into(),
        ));
    }
    Ok(id)
}

/// Parse an item identifier supplied as free text (query string).
pub fn parse_item_id(raw: &str) -> Result<DbId, CoreError> {
    require_item_id(Some(&LooseInt::Text(raw.to_string())))
}

/// Validate a quantity, returning it narrowed to the storage type.
pub fn validate_quantity(quantity: i64) -> Result<i32, CoreError> {
    if quantity < i64::from(MIN_QUANTITY) {
        return Err(CoreError::Validation(format!(
            "quantity must be at least {MIN_QUANTITY}"
        )));
    }
    i32::try_from(quantity)
        .map_err(|_| CoreError::Validation(format!("quantity must not exceed {}", i32::MAX)))
}

/// Quantity for an add/merge request: defaults to [`DEFAULT_QUANTITY`].
pub fn quantity_or_default(raw: Option<&LooseInt>) -> Result<i32, CoreError> {
    match raw {
        None => Ok(DEFAULT_QUANTITY),
        Some(q) => validate_quantity(q.to_i64("quantity")?),
    }
}

/// Quantity for a set request: required.
pub fn require_quantity(raw: Option<&LooseInt>) -> Result<i32, CoreError> {
    let raw = raw.ok_or_else(|| CoreError::Validation("quantity is required".into()))?;
    validate_quantity(raw.to_i64("quantity")?)
}
