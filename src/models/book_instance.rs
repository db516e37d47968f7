//! Book instance (lendable physical copy) model

use chrono::NaiveDate;
use sqlx::FromRow;

use super::{
    book::Book,
    enums::{Format, Status},
    publisher::Publisher,
};

/// One physical copy of a book
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BookInstance {
    pub id: i64,
    pub book_id: i64,
    pub publisher_id: Option<i64>,
    pub number_of_pages: i32,
    pub receipt_date: NaiveDate,
    pub status: Status,
    pub format: Format,

    #[sqlx(skip)]
    pub book: Option<Book>,
    #[sqlx(skip)]
    pub publisher: Option<Publisher>,
}
