//! # Error Handling Middleware
//!
//! Maps [`BookingError`] onto HTTP status codes and the JSON error body
//! `{"error": "..."}` used by every endpoint.
//!
//! | Error | Status |
//! |---|---|
//! | `Validation` | 400 |
//! | `NotFound` | 404 |
//! | `Conflict` | 409 |
//! | `Database`, `Internal` | 500 |
//!
//! Server-side failures are logged in full and answered with a generic
//! message so driver or SQL details never reach the client.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use tutorslot_core::errors::BookingError;

const INTERNAL_MESSAGE: &str = "An internal error occurred. Please try again later.";

/// Application error wrapper that provides HTTP status code mapping
#[derive(Debug)]
pub struct AppError(pub BookingError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BookingError::Validation(_) => StatusCode::BAD_REQUEST,
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Conflict(_) => StatusCode::CONFLICT,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status.is_server_error() {
            error!(error = ?self.0, "Request failed");
            INTERNAL_MESSAGE.to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

/// Unhandled repository errors are treated as database failures.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}

/// Malformed JSON bodies are client errors, reported in the usual error shape.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(BookingError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(BookingError::Validation(rejection.body_text()))
    }
}

/// Maps a BookingError to an HTTP response
pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}
