//! Book API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::parse_id_list;
use crate::{
    dto::BookDto,
    error::AppResult,
    models::{Format, Status},
    AppState,
};

/// Book filters, tried in this order
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    pub isbn: Option<String>,
    /// Case-insensitive partial title
    pub title: Option<String>,
    pub language: Option<String>,
    /// Comma-separated; books by all of these authors
    pub author_ids: Option<String>,
    /// Comma-separated; books in all of these genres
    pub genre_ids: Option<String>,
    /// Comma-separated; books in all of these categories
    pub category_ids: Option<String>,
    pub publisher_id: Option<i64>,
    pub status: Option<Status>,
    pub format: Option<Format>,
}

/// List books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<BookDto>),
        (status = 400, description = "Invalid filter", body = crate::error::ErrorResponse),
        (status = 404, description = "No book with that ISBN", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<BookDto>>> {
    let books = &state.services.books;
    let found = if let Some(isbn) = query.isbn {
        vec![books.find_by_isbn(&isbn).await?]
    } else if let Some(title) = query.title {
        books.find_by_title_like(&title).await?
    } else if let Some(language) = query.language {
        books.find_by_language(&language).await?
    } else if let Some(raw) = query.author_ids {
        books
            .find_by_author_ids(&parse_id_list(&raw, "author_ids")?)
            .await?
    } else if let Some(raw) = query.genre_ids {
        books
            .find_by_genre_ids(&parse_id_list(&raw, "genre_ids")?)
            .await?
    } else if let Some(raw) = query.category_ids {
        books
            .find_by_category_ids(&parse_id_list(&raw, "category_ids")?)
            .await?
    } else if let Some(publisher_id) = query.publisher_id {
        books.find_by_publisher_id(publisher_id).await?
    } else if let Some(status) = query.status {
        books.find_by_status(status).await
    } else if let Some(format) = query.format {
        books.find_by_format(format).await
    } else {
        books.find_all().await
    };
    Ok(Json(found))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book with authors, genres, categories and publisher", body = BookDto),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<BookDto>> {
    let book = state.services.books.find_by_id(id).await?;
    Ok(Json(book))
}

/// Create book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookDto,
    responses(
        (status = 201, description = "Book created", body = BookDto),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 409, description = "ISBN already catalogued", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(dto): Json<BookDto>,
) -> AppResult<(StatusCode, Json<BookDto>)> {
    let book = state.services.books.save(dto).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    request_body = BookDto,
    responses(
        (status = 200, description = "Book updated", body = BookDto),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<BookDto>,
) -> AppResult<Json<BookDto>> {
    let book = state.services.books.update(BookDto { id, ..dto }).await?;
    Ok(Json(book))
}

/// Delete book and its copies
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.books.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
