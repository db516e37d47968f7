//! Genre DTO

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Genre;

/// Genre as shown to clients; `name` is the natural key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GenreDto {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub description: String,
}

impl From<Genre> for GenreDto {
    fn from(g: Genre) -> Self {
        Self {
            id: g.id,
            name: g.name,
            description: g.description,
        }
    }
}

impl From<GenreDto> for Genre {
    fn from(dto: GenreDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            description: dto.description,
        }
    }
}
