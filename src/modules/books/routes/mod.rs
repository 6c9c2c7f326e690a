use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use shelf_http::error::AppError;

use super::models::{Book, BookFields};
use super::service::{BookError, BookService};

const NOT_FOUND_MESSAGE: &str = "Book not found";

/// HTTP routes for the Books module, relative to its mount point.
pub fn router(service: Arc<BookService>) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/health", get(health_check))
        .route("/{id}", put(update_book).delete(delete_book))
        .with_state(service)
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::NotFound { .. } => AppError::not_found(NOT_FOUND_MESSAGE),
            BookError::Store(e) => AppError::Internal(anyhow::Error::new(e)),
            BookError::Task(e) => AppError::Internal(anyhow::Error::new(e)),
        }
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(State(service): State<Arc<BookService>>) -> Json<Vec<Book>> {
    Json(service.list().await)
}

async fn create_book(
    State(service): State<Arc<BookService>>,
    payload: Result<Json<BookFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let Json(fields) = payload?;
    let book = service.create(fields).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update_book(
    State(service): State<Arc<BookService>>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<BookFields>, JsonRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(id) = id.map_err(|_| AppError::not_found(NOT_FOUND_MESSAGE))?;
    let Json(fields) = payload?;
    Ok(Json(service.update(id, fields).await?))
}

async fn delete_book(
    State(service): State<Arc<BookService>>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Book>, AppError> {
    let Path(id) = id.map_err(|_| AppError::not_found(NOT_FOUND_MESSAGE))?;
    Ok(Json(service.delete(id).await?))
}
