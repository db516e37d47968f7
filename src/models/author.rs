//! Author model

use chrono::NaiveDate;
use sqlx::FromRow;

use super::enums::Sex;

/// Author row
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Author {
    pub id: i64,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub sex: Sex,
    pub nationality: String,
}
