//! Patron (library member) model

use chrono::NaiveDate;
use sqlx::FromRow;

/// Patron row. Card id, email, phone and address are each unique.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Patron {
    pub id: i64,
    pub card_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub register_date: NaiveDate,

    /// Copies currently recorded against this patron (`patron_book_instances`)
    #[sqlx(skip)]
    pub book_instance_ids: Vec<i64>,
}
