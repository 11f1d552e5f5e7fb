//! Domain types and pure rules for the shop backend.
//!
//! Nothing in here touches the database or HTTP, so the rules can be unit
//! tested in isolation and reused by any caller that can supply a user id.

pub mod cart;
pub mod catalog;
pub mod error;
pub mod types;
