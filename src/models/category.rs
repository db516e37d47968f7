//! Category model

use sqlx::FromRow;

/// Category row; `name` is unique
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
}
