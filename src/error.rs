//! Error types and error handling for the application
//!
//! This module defines custom error types that can be converted to HTTP
//! responses. All errors implement `IntoResponse` to provide consistent
//! error formatting.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// All errors that can occur in the application are represented by this
/// enum. Each variant implements automatic conversion to HTTP responses via
/// `IntoResponse`.
#[derive(Error, Debug)]
pub enum AppError {
    /// A mandatory input field is absent or empty
    #[error("Field {0} is required")]
    FieldsRequired(String),

    /// A supplied value cannot be coerced to its field's type
    #[error("Invalid value for field {0}")]
    InvalidParam(String),

    /// Requested property is absent or not visible under current flags
    #[error("not found property")]
    NotFound,

    /// A mutation's modified-count invariant was violated
    #[error("{0}")]
    Server(String),

    /// Error returned by the database driver
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::FieldsRequired(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::InvalidParam(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Server(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_required_message() {
        let err = AppError::FieldsRequired("price".to_string());
        assert_eq!(err.to_string(), "Field price is required");
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (
                AppError::FieldsRequired("price".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::InvalidParam("rooms".into()),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::NotFound, StatusCode::NOT_FOUND),
            (
                AppError::Server("error to update property".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = err.into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
