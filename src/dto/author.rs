//! Author DTO

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Author, Sex};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthorDto {
    /// Generated identifier; omitted or 0 when creating
    #[serde(default)]
    pub id: i64,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub sex: Sex,
    pub nationality: String,
}

impl From<Author> for AuthorDto {
    fn from(a: Author) -> Self {
        Self {
            id: a.id,
            full_name: a.full_name,
            date_of_birth: a.date_of_birth,
            sex: a.sex,
            nationality: a.nationality,
        }
    }
}

impl From<AuthorDto> for Author {
    fn from(dto: AuthorDto) -> Self {
        Self {
            id: dto.id,
            full_name: dto.full_name,
            date_of_birth: dto.date_of_birth,
            sex: dto.sex,
            nationality: dto.nationality,
        }
    }
}
