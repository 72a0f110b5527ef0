// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Shared by the generator, the stores and the HTTP layer.
#[derive(Debug)]
pub enum AppError {
    // 409 Conflict (a quiz already exists for the date)
    AlreadyExists(String),

    // 404 Not Found
    NotFound(String),

    // 400 Bad Request (e.g., unparsable date)
    InvalidInput(String),

    // 500 Internal Server Error: a pool was too small to draw from
    PoolExhausted(String),

    // 500 Internal Server Error: reference data could not be joined
    MissingReference(String),

    // 500 Internal Server Error: anything raised by the data layer
    PersistenceFailure(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::AlreadyExists(msg) => write!(f, "already exists: {}", msg),
            AppError::NotFound(msg) => write!(f, "not found: {}", msg),
            AppError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            AppError::PoolExhausted(msg) => write!(f, "pool exhausted: {}", msg),
            AppError::MissingReference(msg) => write!(f, "missing reference: {}", msg),
            AppError::PersistenceFailure(msg) => write!(f, "persistence failure: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AlreadyExists(msg) => (StatusCode::CONFLICT, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PoolExhausted(msg) | AppError::MissingReference(msg) => {
                tracing::error!("Generation failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::PersistenceFailure(msg) => {
                tracing::error!("Persistence failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::PersistenceFailure`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::PersistenceFailure(err.to_string())
    }
}
