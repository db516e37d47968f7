//! Publisher model

use chrono::NaiveDate;
use sqlx::FromRow;

/// Publisher row. `name` is unique, and so are the optional contact
/// columns when present.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Publisher {
    pub id: i64,
    pub name: String,
    pub foundation_date: NaiveDate,
    pub address: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}
