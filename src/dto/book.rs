//! Book DTO

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{not_blank, not_in_future, AuthorDto, CategoryDto, GenreDto, PublisherDto};
use crate::models::{Book, Format, Status};

/// Book with its associations resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
pub struct BookDto {
    #[serde(default)]
    pub id: i64,
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub isbn: String,
    #[validate(custom(function = "not_blank"))]
    pub language: String,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub number_of_pages: i32,
    #[serde(default)]
    #[validate(length(min = 1, message = "cannot be empty"))]
    pub authors: Vec<AuthorDto>,
    #[serde(default)]
    #[validate(length(min = 1, message = "cannot be empty"))]
    pub genres: Vec<GenreDto>,
    #[serde(default)]
    #[validate(length(min = 1, message = "cannot be empty"))]
    pub categories: Vec<CategoryDto>,
    #[serde(default)]
    #[validate(required(message = "is required"))]
    pub publisher: Option<PublisherDto>,
    pub status: Status,
    pub format: Format,
    #[validate(custom(function = "not_in_future"))]
    pub receipt_date: NaiveDate,
}

impl From<Book> for BookDto {
    fn from(b: Book) -> Self {
        Self {
            id: b.id,
            title: b.title,
            isbn: b.isbn,
            language: b.language,
            number_of_pages: b.number_of_pages,
            authors: b.authors.into_iter().map(AuthorDto::from).collect(),
            genres: b.genres.into_iter().map(GenreDto::from).collect(),
            categories: b.categories.into_iter().map(CategoryDto::from).collect(),
            publisher: b.publisher.map(PublisherDto::from),
            status: b.status,
            format: b.format,
            receipt_date: b.receipt_date,
        }
    }
}

impl From<BookDto> for Book {
    fn from(dto: BookDto) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            isbn: dto.isbn,
            language: dto.language,
            number_of_pages: dto.number_of_pages,
            publisher_id: dto.publisher.as_ref().map(|p| p.id),
            status: dto.status,
            format: dto.format,
            receipt_date: dto.receipt_date,
            authors: dto.authors.into_iter().map(Into::into).collect(),
            genres: dto.genres.into_iter().map(Into::into).collect(),
            categories: dto.categories.into_iter().map(Into::into).collect(),
            publisher: dto.publisher.map(Into::into),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::pride_and_prejudice;
    use super::*;
    use crate::dto::describe_validation_errors;
    use chrono::{Duration, Local};

    #[test]
    fn test_valid_book() {
        assert!(pride_and_prejudice().validate().is_ok());
    }

    #[test]
    fn test_every_rule_is_collected() {
        let dto = BookDto {
            title: "".to_string(),
            isbn: "  ".to_string(),
            language: "".to_string(),
            number_of_pages: 0,
            authors: vec![],
            genres: vec![],
            categories: vec![],
            publisher: None,
            receipt_date: Local::now().date_naive() + Duration::days(2),
            ..pride_and_prejudice()
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(
            describe_validation_errors(&errors),
            "Validation failed: authors cannot be empty; categories cannot be empty; \
             genres cannot be empty; isbn cannot be blank; language cannot be blank; \
             number_of_pages must be at least 1; publisher is required; \
             receipt_date cannot be in the future; title cannot be blank"
        );
    }

    #[test]
    fn test_mapping_keeps_association_ids() {
        let book: Book = pride_and_prejudice().into();
        assert_eq!(book.author_ids(), vec![1]);
        assert_eq!(book.genre_ids(), vec![2]);
        assert_eq!(book.category_ids(), vec![3]);
        assert_eq!(book.publisher_id, Some(4));

        let back = BookDto::from(book);
        assert_eq!(back, pride_and_prejudice());
    }
}
