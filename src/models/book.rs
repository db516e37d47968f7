//! Book (bibliographic record) model

use chrono::NaiveDate;
use sqlx::FromRow;

use super::{
    author::Author,
    category::Category,
    enums::{Format, Status},
    genre::Genre,
    publisher::Publisher,
};

/// Book row with its associations.
///
/// The association fields are not columns of `books`; the repository fills
/// them from the join tables after the row is read, and writes them back
/// through the same tables.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub isbn: String,
    pub language: String,
    pub number_of_pages: i32,
    pub publisher_id: Option<i64>,
    pub status: Status,
    pub format: Format,
    pub receipt_date: NaiveDate,

    #[sqlx(skip)]
    pub authors: Vec<Author>,
    #[sqlx(skip)]
    pub genres: Vec<Genre>,
    #[sqlx(skip)]
    pub categories: Vec<Category>,
    #[sqlx(skip)]
    pub publisher: Option<Publisher>,
}

impl Book {
    pub fn author_ids(&self) -> Vec<i64> {
        self.authors.iter().map(|a| a.id).collect()
    }

    pub fn genre_ids(&self) -> Vec<i64> {
        self.genres.iter().map(|g| g.id).collect()
    }

    pub fn category_ids(&self) -> Vec<i64> {
        self.categories.iter().map(|c| c.id).collect()
    }
}
