//! Request extractors whose failures use the API error envelope.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` with rejections converted to [`AppError`].
///
/// Syntax errors and a missing `Content-Type: application/json` become 400
/// `BAD_REQUEST`; valid JSON of the wrong shape becomes 400 `VALIDATION_ERROR`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
