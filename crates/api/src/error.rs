use std::borrow::Cow;

use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use shop_core::error::CoreError;
use sqlx::error::ErrorKind;

/// Application-level error type for HTTP handlers.
///
/// Every variant renders as `{ "error": <message>, "code": <CODE> }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The request could not be read: bad JSON, wrong content type, broken
    /// multipart stream.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Logged in full, reported to the client as a generic 500.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Status, machine-readable code, and client-facing message.
type ErrorParts = (StatusCode, &'static str, Cow<'static, str>);

const INTERNAL: ErrorParts = (
    StatusCode::INTERNAL_SERVER_ERROR,
    "INTERNAL_ERROR",
    Cow::Borrowed("An internal error occurred"),
);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Well-formed JSON of the wrong shape.
            JsonRejection::JsonDataError(e) => {
                AppError::Core(CoreError::Validation(e.body_text()))
            }
            other => AppError::BadRequest(other.body_text()),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl AppError {
    fn parts(&self) -> ErrorParts {
        match self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => sqlx_parts(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone().into()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                INTERNAL
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        (status, axum::Json(json!({ "error": message, "code": code }))).into_response()
    }
}

fn core_parts(err: &CoreError) -> ErrorParts {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found").into(),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone().into()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone().into()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone().into()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone().into()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            INTERNAL
        }
    }
}

/// Map constraint failures the schema is expected to produce onto client
/// errors. Anything unexpected is logged and hidden behind a 500.
///
/// | Failure                                   | Status |
/// |-------------------------------------------|--------|
/// | `RowNotFound`                             | 404    |
/// | foreign key (`23503`), referent vanished  | 404    |
/// | unique on a `uq_*` constraint (`23505`)   | 409    |
/// | check (`23514`), numeric range (`22003`)  | 400    |
fn sqlx_parts(err: &sqlx::Error) -> ErrorParts {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return (StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found".into())
        }
        sqlx::Error::Database(db_err) => db_err,
        other => {
            tracing::error!(error = %other, "Database error");
            return INTERNAL;
        }
    };

    match db_err.kind() {
        ErrorKind::ForeignKeyViolation => {
            return (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Referenced resource no longer exists".into(),
            );
        }
        ErrorKind::UniqueViolation => {
            if let Some(constraint) = db_err.constraint().filter(|c| c.starts_with("uq_")) {
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}").into(),
                );
            }
        }
        ErrorKind::CheckViolation => {
            return (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "Value out of range".into());
        }
        _ if db_err.code().as_deref() == Some("22003") => {
            return (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "Value out of range".into());
        }
        _ => {}
    }

    tracing::error!(error = %db_err, "Database error");
    INTERNAL
}
