//! Error types for the bookshelf server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Broad category of a book store failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookErrorKind {
    /// Malformed or inconsistent input
    Validation,
    /// Referenced id does not exist
    NotFound,
}

/// Failure raised by the book store.
///
/// Carries only the machine-usable reason; wording shown to clients is
/// chosen by the API layer per operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    #[error("missing name")]
    MissingName,

    #[error("readPage exceeds pageCount")]
    ReadPageExceedsPageCount,

    #[error("book not found")]
    BookNotFound,

    #[error("id not found")]
    IdNotFound,
}

impl BookError {
    pub fn kind(&self) -> BookErrorKind {
        match self {
            BookError::MissingName | BookError::ReadPageExceedsPageCount => {
                BookErrorKind::Validation
            }
            BookError::BookNotFound | BookError::IdNotFound => BookErrorKind::NotFound,
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Always "fail"
    pub status: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(ErrorResponse {
            status: "fail".to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for book store operations
pub type BookResult<T> = Result<T, BookError>;
