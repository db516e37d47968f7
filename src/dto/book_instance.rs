//! Book instance DTO

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{BookDto, PublisherDto};
use crate::models::{BookInstance, Format, Status};

/// A lendable copy, with the book it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookInstanceDto {
    #[serde(default)]
    pub id: i64,
    pub book: BookDto,
    #[serde(default)]
    pub publisher: Option<PublisherDto>,
    pub number_of_pages: i32,
    pub receipt_date: NaiveDate,
    pub status: Status,
    pub format: Format,
}

impl BookInstanceDto {
    /// Builds the DTO from a loaded instance; `None` when the owning book was
    /// not loaded alongside it.
    pub fn try_from_model(instance: BookInstance) -> Option<Self> {
        let book = instance.book?;
        Some(Self {
            id: instance.id,
            book: book.into(),
            publisher: instance.publisher.map(PublisherDto::from),
            number_of_pages: instance.number_of_pages,
            receipt_date: instance.receipt_date,
            status: instance.status,
            format: instance.format,
        })
    }
}

impl From<BookInstanceDto> for BookInstance {
    fn from(dto: BookInstanceDto) -> Self {
        Self {
            id: dto.id,
            book_id: dto.book.id,
            publisher_id: dto.publisher.as_ref().map(|p| p.id),
            number_of_pages: dto.number_of_pages,
            receipt_date: dto.receipt_date,
            status: dto.status,
            format: dto.format,
            book: Some(dto.book.into()),
            publisher: dto.publisher.map(Into::into),
        }
    }
}
