//! Genre model

use sqlx::FromRow;

/// Genre row; `name` is unique
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Genre {
    pub id: i64,
    pub name: String,
    pub description: String,
}
