//! Error types for the HTTP layer.
//!
//! `ApiError` is what handlers return; it renders as `{"error": "..."}`
//! with the matching status code. `ServerError` covers process startup.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use resttodo_core::db::DbError;
use resttodo_core::{RepoError, TodoValidationError};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const NOT_FOUND_MESSAGE: &str = "Todo not found";
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Request-level failure surfaced to the caller.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed body or rejected input. Maps to 400.
    Validation(String),
    /// No todo with the requested id. Maps to 404.
    NotFound,
    /// Storage or runtime failure. Maps to 500; details stay in logs.
    Internal(String),
}

impl ApiError {
    pub fn invalid_body() -> Self {
        Self::Validation("Invalid JSON body".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &str {
        match self {
            Self::Validation(message) => message,
            Self::NotFound => NOT_FOUND_MESSAGE,
            Self::Internal(_) => INTERNAL_MESSAGE,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "validation failed: {message}"),
            Self::NotFound => write!(f, "{NOT_FOUND_MESSAGE}"),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for ApiError {}

impl From<TodoValidationError> for ApiError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(_) => Self::NotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(details) = &self {
            error!(
                "event=request_failed module=server status=error error_code=internal error={}",
                details
            );
        }

        let body = Json(ErrorBody {
            error: self.public_message(),
        });
        (self.status(), body).into_response()
    }
}

/// Failure while starting or running the server process.
#[derive(Debug)]
pub enum ServerError {
    Db(DbError),
    Io(std::io::Error),
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "database initialization failed: {err}"),
            Self::Io(err) => write!(f, "server I/O failed: {err}"),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<DbError> for ServerError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
