//! Request handlers.
//!
//! Handlers validate input with `shop_core`, delegate to the repositories in
//! `shop_db`, and map failures via [`AppError`](crate::error::AppError).

pub mod auth;
pub mod cart;
pub mod items;
