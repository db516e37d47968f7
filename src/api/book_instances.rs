//! Book instance API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    dto::BookInstanceDto,
    error::AppResult,
    models::{Format, Status},
    AppState,
};

/// Copy filters, tried in this order
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookInstanceQuery {
    /// Copies of this book
    pub book_id: Option<i64>,
    pub publisher_id: Option<i64>,
    pub status: Option<Status>,
    pub format: Option<Format>,
}

/// List book instances
#[utoipa::path(
    get,
    path = "/book-instances",
    tag = "book-instances",
    params(BookInstanceQuery),
    responses(
        (status = 200, description = "Matching copies", body = Vec<BookInstanceDto>),
        (status = 400, description = "Invalid filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_book_instances(
    State(state): State<AppState>,
    Query(query): Query<BookInstanceQuery>,
) -> AppResult<Json<Vec<BookInstanceDto>>> {
    let copies = &state.services.book_instances;
    let found = if let Some(book_id) = query.book_id {
        copies.find_by_book_id(book_id).await?
    } else if let Some(publisher_id) = query.publisher_id {
        copies.find_by_publisher_id(publisher_id).await?
    } else if let Some(status) = query.status {
        copies.find_by_status(status).await
    } else if let Some(format) = query.format {
        copies.find_by_format(format).await
    } else {
        copies.find_all().await
    };
    Ok(Json(found))
}

/// Get book instance by ID
#[utoipa::path(
    get,
    path = "/book-instances/{id}",
    tag = "book-instances",
    params(("id" = i64, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Copy with its book", body = BookInstanceDto),
        (status = 404, description = "Copy not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book_instance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<BookInstanceDto>> {
    let copy = state.services.book_instances.find_by_id(id).await?;
    Ok(Json(copy))
}

/// Create book instance
#[utoipa::path(
    post,
    path = "/book-instances",
    tag = "book-instances",
    request_body = BookInstanceDto,
    responses(
        (status = 201, description = "Copy created", body = BookInstanceDto),
        (status = 400, description = "Book has no id", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book_instance(
    State(state): State<AppState>,
    Json(dto): Json<BookInstanceDto>,
) -> AppResult<(StatusCode, Json<BookInstanceDto>)> {
    let copy = state.services.book_instances.save(dto).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// Update book instance
#[utoipa::path(
    put,
    path = "/book-instances/{id}",
    tag = "book-instances",
    params(("id" = i64, Path, description = "Book instance ID")),
    request_body = BookInstanceDto,
    responses(
        (status = 200, description = "Copy updated", body = BookInstanceDto),
        (status = 404, description = "Copy not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book_instance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<BookInstanceDto>,
) -> AppResult<Json<BookInstanceDto>> {
    let copy = state
        .services
        .book_instances
        .update(BookInstanceDto { id, ..dto })
        .await?;
    Ok(Json(copy))
}

/// Delete book instance
#[utoipa::path(
    delete,
    path = "/book-instances/{id}",
    tag = "book-instances",
    params(("id" = i64, Path, description = "Book instance ID")),
    responses(
        (status = 204, description = "Copy deleted"),
        (status = 404, description = "Copy not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book_instance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.book_instances.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
