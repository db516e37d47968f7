//! Category API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{dto::CategoryDto, error::AppResult, AppState};

/// Category filters, tried in this order
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryQuery {
    /// Exact name
    pub name: Option<String>,
    /// Case-insensitive partial name
    pub name_like: Option<String>,
    /// Categories of this book
    pub book_id: Option<i64>,
}

/// List categories
#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Matching categories", body = Vec<CategoryDto>),
        (status = 400, description = "Invalid filter", body = crate::error::ErrorResponse),
        (status = 404, description = "No category with that name", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> AppResult<Json<Vec<CategoryDto>>> {
    let categories = &state.services.categories;
    let found = if let Some(name) = query.name {
        vec![categories.find_by_name(&name).await?]
    } else if let Some(name) = query.name_like {
        categories.find_by_name_like(&name).await?
    } else if let Some(book_id) = query.book_id {
        categories.find_by_book_id(book_id).await?
    } else {
        categories.find_all().await
    };
    Ok(Json(found))
}

/// Get category by ID
#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category details", body = CategoryDto),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CategoryDto>> {
    let category = state.services.categories.find_by_id(id).await?;
    Ok(Json(category))
}

/// Create category
#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    request_body = CategoryDto,
    responses(
        (status = 201, description = "Category created", body = CategoryDto),
        (status = 409, description = "Name already taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(dto): Json<CategoryDto>,
) -> AppResult<(StatusCode, Json<CategoryDto>)> {
    let category = state.services.categories.save(dto).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Update category
#[utoipa::path(
    put,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category ID")),
    request_body = CategoryDto,
    responses(
        (status = 200, description = "Category updated", body = CategoryDto),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<CategoryDto>,
) -> AppResult<Json<CategoryDto>> {
    let category = state.services.categories.update(CategoryDto { id, ..dto }).await?;
    Ok(Json(category))
}

/// Delete category
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.categories.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
