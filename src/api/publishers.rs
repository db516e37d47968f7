//! Publisher API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{dto::PublisherDto, error::AppResult, AppState};

/// Publisher filters, tried in this order
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PublisherQuery {
    /// Exact name
    pub name: Option<String>,
    /// Case-insensitive partial name
    pub name_like: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    /// Publisher of this book
    pub book_id: Option<i64>,
}

/// List publishers
#[utoipa::path(
    get,
    path = "/publishers",
    tag = "publishers",
    params(PublisherQuery),
    responses(
        (status = 200, description = "Matching publishers", body = Vec<PublisherDto>),
        (status = 400, description = "Invalid filter", body = crate::error::ErrorResponse),
        (status = 404, description = "No publisher for a single-match filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_publishers(
    State(state): State<AppState>,
    Query(query): Query<PublisherQuery>,
) -> AppResult<Json<Vec<PublisherDto>>> {
    let publishers = &state.services.publishers;
    let found = if let Some(name) = query.name {
        vec![publishers.find_by_name(&name).await?]
    } else if let Some(name) = query.name_like {
        publishers.find_by_name_like(&name).await?
    } else if let Some(email) = query.email {
        vec![publishers.find_by_email(&email).await?]
    } else if let Some(website) = query.website {
        vec![publishers.find_by_website(&website).await?]
    } else if let Some(address) = query.address {
        vec![publishers.find_by_address(&address).await?]
    } else if let Some(book_id) = query.book_id {
        vec![publishers.find_by_book_id(book_id).await?]
    } else {
        publishers.find_all().await
    };
    Ok(Json(found))
}

/// Get publisher by ID
#[utoipa::path(
    get,
    path = "/publishers/{id}",
    tag = "publishers",
    params(("id" = i64, Path, description = "Publisher ID")),
    responses(
        (status = 200, description = "Publisher details", body = PublisherDto),
        (status = 404, description = "Publisher not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_publisher(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PublisherDto>> {
    let publisher = state.services.publishers.find_by_id(id).await?;
    Ok(Json(publisher))
}

/// Create publisher
#[utoipa::path(
    post,
    path = "/publishers",
    tag = "publishers",
    request_body = PublisherDto,
    responses(
        (status = 201, description = "Publisher created", body = PublisherDto),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 409, description = "Name already taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_publisher(
    State(state): State<AppState>,
    Json(dto): Json<PublisherDto>,
) -> AppResult<(StatusCode, Json<PublisherDto>)> {
    let publisher = state.services.publishers.save(dto).await?;
    Ok((StatusCode::CREATED, Json(publisher)))
}

/// Update publisher
#[utoipa::path(
    put,
    path = "/publishers/{id}",
    tag = "publishers",
    params(("id" = i64, Path, description = "Publisher ID")),
    request_body = PublisherDto,
    responses(
        (status = 200, description = "Publisher updated", body = PublisherDto),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 404, description = "Publisher not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_publisher(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<PublisherDto>,
) -> AppResult<Json<PublisherDto>> {
    let publisher = state
        .services
        .publishers
        .update(PublisherDto { id, ..dto })
        .await?;
    Ok(Json(publisher))
}

/// Delete publisher
#[utoipa::path(
    delete,
    path = "/publishers/{id}",
    tag = "publishers",
    params(("id" = i64, Path, description = "Publisher ID")),
    responses(
        (status = 204, description = "Publisher deleted"),
        (status = 404, description = "Publisher not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_publisher(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.publishers.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
