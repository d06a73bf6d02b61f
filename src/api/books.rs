//! Book endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult, BookError},
    models::book::{Book, BookFilter, BookPayload, BookQuery, BookSummary},
};

const SUCCESS: &str = "success";

/// Envelope carrying only a message
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct BookIdData {
    #[serde(rename = "bookId")]
    pub book_id: String,
}

#[derive(Serialize, ToSchema)]
pub struct BookCreatedResponse {
    pub status: String,
    pub message: String,
    pub data: BookIdData,
}

#[derive(Serialize, ToSchema)]
pub struct BookListData {
    pub books: Vec<BookSummary>,
}

#[derive(Serialize, ToSchema)]
pub struct BookListResponse {
    pub status: String,
    pub data: BookListData,
}

#[derive(Serialize, ToSchema)]
pub struct BookData {
    pub book: Book,
}

#[derive(Serialize, ToSchema)]
pub struct BookResponse {
    pub status: String,
    pub data: BookData,
}

/// Turn a store failure into a client-facing error for the given action
fn rejection(action: &str, err: BookError) -> AppError {
    tracing::debug!(kind = ?err.kind(), "Rejected {} request: {}", action, err);

    match err {
        BookError::MissingName => AppError::Validation(format!(
            "Failed to {} book. Please provide the book name",
            action
        )),
        BookError::ReadPageExceedsPageCount => AppError::Validation(format!(
            "Failed to {} book. readPage must not be greater than pageCount",
            action
        )),
        BookError::IdNotFound => {
            AppError::NotFound(format!("Failed to {} book. Id not found", action))
        }
        BookError::BookNotFound => AppError::NotFound("Book not found".to_string()),
    }
}

fn payload(body: Result<Json<BookPayload>, JsonRejection>) -> AppResult<BookPayload> {
    body.map(|Json(payload)| payload)
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

/// Add a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book added", body = BookCreatedResponse),
        (status = 400, description = "Missing name or readPage above pageCount", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_book(
    State(state): State<crate::AppState>,
    body: Result<Json<BookPayload>, JsonRejection>,
) -> AppResult<(StatusCode, Json<BookCreatedResponse>)> {
    let book_id = state
        .services
        .books
        .create(payload(body)?)
        .map_err(|e| rejection("add", e))?;

    tracing::info!("Book added: id={}", book_id);

    Ok((
        StatusCode::CREATED,
        Json(BookCreatedResponse {
            status: SUCCESS.to_string(),
            message: "Book added successfully".to_string(),
            data: BookIdData { book_id },
        }),
    ))
}

/// List books, optionally filtered by name, reading or finished
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Book summaries", body = BookListResponse)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> Json<BookListResponse> {
    let filter = BookFilter::from(&query);
    let books = state.services.books.list(&filter);

    Json(BookListResponse {
        status: SUCCESS.to_string(),
        data: BookListData { books },
    })
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{book_id}",
    tag = "books",
    params(("book_id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<String>,
) -> AppResult<Json<BookResponse>> {
    let book = state
        .services
        .books
        .get_by_id(&book_id)
        .map_err(|e| rejection("get", e))?;

    Ok(Json(BookResponse {
        status: SUCCESS.to_string(),
        data: BookData { book },
    }))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{book_id}",
    tag = "books",
    params(("book_id" = String, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = MessageResponse),
        (status = 400, description = "Missing name or readPage above pageCount", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<String>,
    body: Result<Json<BookPayload>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .books
        .update_by_id(&book_id, payload(body)?)
        .map_err(|e| rejection("update", e))?;

    tracing::info!("Book updated: id={}", book_id);

    Ok(Json(MessageResponse {
        status: SUCCESS.to_string(),
        message: "Book updated successfully".to_string(),
    }))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{book_id}",
    tag = "books",
    params(("book_id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .books
        .delete_by_id(&book_id)
        .map_err(|e| rejection("delete", e))?;

    tracing::info!("Book deleted: id={}", book_id);

    Ok(Json(MessageResponse {
        status: SUCCESS.to_string(),
        message: "Book deleted successfully".to_string(),
    }))
}
