//! Genre API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{dto::GenreDto, error::AppResult, AppState};

/// Genre filters, tried in this order
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GenreQuery {
    /// Exact name
    pub name: Option<String>,
    /// Case-insensitive partial name
    pub name_like: Option<String>,
    /// Genres of this book
    pub book_id: Option<i64>,
}

/// List genres
#[utoipa::path(
    get,
    path = "/genres",
    tag = "genres",
    params(GenreQuery),
    responses(
        (status = 200, description = "Matching genres", body = Vec<GenreDto>),
        (status = 400, description = "Invalid filter", body = crate::error::ErrorResponse),
        (status = 404, description = "No genre with that name", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_genres(
    State(state): State<AppState>,
    Query(query): Query<GenreQuery>,
) -> AppResult<Json<Vec<GenreDto>>> {
    let genres = &state.services.genres;
    let found = if let Some(name) = query.name {
        vec![genres.find_by_name(&name).await?]
    } else if let Some(name) = query.name_like {
        genres.find_by_name_like(&name).await?
    } else if let Some(book_id) = query.book_id {
        genres.find_by_book_id(book_id).await?
    } else {
        genres.find_all().await
    };
    Ok(Json(found))
}

/// Get genre by ID
#[utoipa::path(
    get,
    path = "/genres/{id}",
    tag = "genres",
    params(("id" = i64, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre details", body = GenreDto),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<GenreDto>> {
    let genre = state.services.genres.find_by_id(id).await?;
    Ok(Json(genre))
}

/// Create genre
#[utoipa::path(
    post,
    path = "/genres",
    tag = "genres",
    request_body = GenreDto,
    responses(
        (status = 201, description = "Genre created", body = GenreDto),
        (status = 409, description = "Name already taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    Json(dto): Json<GenreDto>,
) -> AppResult<(StatusCode, Json<GenreDto>)> {
    let genre = state.services.genres.save(dto).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

/// Update genre
#[utoipa::path(
    put,
    path = "/genres/{id}",
    tag = "genres",
    params(("id" = i64, Path, description = "Genre ID")),
    request_body = GenreDto,
    responses(
        (status = 200, description = "Genre updated", body = GenreDto),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<GenreDto>,
) -> AppResult<Json<GenreDto>> {
    let genre = state.services.genres.update(GenreDto { id, ..dto }).await?;
    Ok(Json(genre))
}

/// Delete genre
#[utoipa::path(
    delete,
    path = "/genres/{id}",
    tag = "genres",
    params(("id" = i64, Path, description = "Genre ID")),
    responses(
        (status = 204, description = "Genre deleted"),
        (status = 404, description = "Genre not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.genres.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
