//! Patron DTO

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Patron;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PatronDto {
    #[serde(default)]
    pub id: i64,
    /// Library card number; unique
    pub card_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub register_date: NaiveDate,
    /// Ids of the copies recorded against this patron
    #[serde(default)]
    pub book_instance_ids: Vec<i64>,
}

impl From<Patron> for PatronDto {
    fn from(p: Patron) -> Self {
        Self {
            id: p.id,
            card_id: p.card_id,
            full_name: p.full_name,
            email: p.email,
            phone: p.phone,
            address: p.address,
            date_of_birth: p.date_of_birth,
            register_date: p.register_date,
            book_instance_ids: p.book_instance_ids,
        }
    }
}

impl From<PatronDto> for Patron {
    fn from(dto: PatronDto) -> Self {
        Self {
            id: dto.id,
            card_id: dto.card_id,
            full_name: dto.full_name,
            email: dto.email,
            phone: dto.phone,
            address: dto.address,
            date_of_birth: dto.date_of_birth,
            register_date: dto.register_date,
            book_instance_ids: dto.book_instance_ids,
        }
    }
}
