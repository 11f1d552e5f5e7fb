//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and patches where the API writes the table

pub mod cart;
pub mod item;
pub mod session;
pub mod user;
