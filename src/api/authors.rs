//! Author API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{dto::AuthorDto, error::AppResult, models::Sex, AppState};

/// Author filters, tried in this order
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthorQuery {
    /// Exact full name
    pub full_name: Option<String>,
    /// Case-insensitive partial full name
    pub full_name_like: Option<String>,
    pub sex: Option<Sex>,
    /// Authors credited on this book
    pub book_id: Option<i64>,
}

/// List authors
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(AuthorQuery),
    responses(
        (status = 200, description = "Matching authors", body = Vec<AuthorDto>),
        (status = 400, description = "Invalid filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    Query(query): Query<AuthorQuery>,
) -> AppResult<Json<Vec<AuthorDto>>> {
    let authors = &state.services.authors;
    let found = if let Some(full_name) = query.full_name {
        authors.find_by_full_name(&full_name).await?
    } else if let Some(full_name) = query.full_name_like {
        authors.find_by_full_name_like(&full_name).await?
    } else if let Some(sex) = query.sex {
        authors.find_by_sex(sex).await
    } else if let Some(book_id) = query.book_id {
        authors.find_by_book_id(book_id).await?
    } else {
        authors.find_all().await
    };
    Ok(Json(found))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDto),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AuthorDto>> {
    let author = state.services.authors.find_by_id(id).await?;
    Ok(Json(author))
}

/// Create author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = AuthorDto,
    responses(
        (status = 201, description = "Author created", body = AuthorDto)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    Json(dto): Json<AuthorDto>,
) -> AppResult<(StatusCode, Json<AuthorDto>)> {
    let author = state.services.authors.save(dto).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Update author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    request_body = AuthorDto,
    responses(
        (status = 200, description = "Author updated", body = AuthorDto),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<AuthorDto>,
) -> AppResult<Json<AuthorDto>> {
    let author = state.services.authors.update(AuthorDto { id, ..dto }).await?;
    Ok(Json(author))
}

/// Delete author
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i64, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.authors.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
