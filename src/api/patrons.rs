//! Patron API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{dto::PatronDto, error::AppResult, AppState};

/// Patron filters, tried in this order
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PatronQuery {
    pub card_id: Option<String>,
    /// Case-insensitive partial full name
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Patron holding this copy
    pub book_instance_id: Option<i64>,
}

/// List patrons
#[utoipa::path(
    get,
    path = "/patrons",
    tag = "patrons",
    params(PatronQuery),
    responses(
        (status = 200, description = "Matching patrons", body = Vec<PatronDto>),
        (status = 400, description = "Invalid filter", body = crate::error::ErrorResponse),
        (status = 404, description = "No patron for a single-match filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_patrons(
    State(state): State<AppState>,
    Query(query): Query<PatronQuery>,
) -> AppResult<Json<Vec<PatronDto>>> {
    let patrons = &state.services.patrons;
    let found = if let Some(card_id) = query.card_id {
        vec![patrons.find_by_card_id(&card_id).await?]
    } else if let Some(full_name) = query.full_name {
        patrons.find_by_full_name_like(&full_name).await?
    } else if let Some(email) = query.email {
        vec![patrons.find_by_email(&email).await?]
    } else if let Some(phone) = query.phone {
        vec![patrons.find_by_phone(&phone).await?]
    } else if let Some(address) = query.address {
        vec![patrons.find_by_address(&address).await?]
    } else if let Some(book_instance_id) = query.book_instance_id {
        vec![patrons.find_by_book_instance_id(book_instance_id).await?]
    } else {
        patrons.find_all().await
    };
    Ok(Json(found))
}

/// Get patron by ID
#[utoipa::path(
    get,
    path = "/patrons/{id}",
    tag = "patrons",
    params(("id" = i64, Path, description = "Patron ID")),
    responses(
        (status = 200, description = "Patron details", body = PatronDto),
        (status = 404, description = "Patron not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_patron(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PatronDto>> {
    let patron = state.services.patrons.find_by_id(id).await?;
    Ok(Json(patron))
}

/// Register patron
#[utoipa::path(
    post,
    path = "/patrons",
    tag = "patrons",
    request_body = PatronDto,
    responses(
        (status = 201, description = "Patron registered", body = PatronDto),
        (status = 409, description = "Card id already issued", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_patron(
    State(state): State<AppState>,
    Json(dto): Json<PatronDto>,
) -> AppResult<(StatusCode, Json<PatronDto>)> {
    let patron = state.services.patrons.save(dto).await?;
    Ok((StatusCode::CREATED, Json(patron)))
}

/// Update patron
#[utoipa::path(
    put,
    path = "/patrons/{id}",
    tag = "patrons",
    params(("id" = i64, Path, description = "Patron ID")),
    request_body = PatronDto,
    responses(
        (status = 200, description = "Patron updated", body = PatronDto),
        (status = 404, description = "Patron not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_patron(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(dto): Json<PatronDto>,
) -> AppResult<Json<PatronDto>> {
    let patron = state.services.patrons.update(PatronDto { id, ..dto }).await?;
    Ok(Json(patron))
}

/// Delete patron
#[utoipa::path(
    delete,
    path = "/patrons/{id}",
    tag = "patrons",
    params(("id" = i64, Path, description = "Patron ID")),
    responses(
        (status = 204, description = "Patron deleted"),
        (status = 404, description = "Patron not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_patron(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.services.patrons.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
