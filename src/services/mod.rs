//! Business logic services
//!
//! Services validate what callers hand them, run natural-key existence
//! checks, and turn the repositories' empty results into typed failures.

pub mod author;
pub mod book;
pub mod book_instance;
pub mod named;
pub mod patron;
pub mod publisher;

use std::fmt::Display;
use validator::Validate;

use crate::{
    dto::{describe_validation_errors, CategoryDto, GenreDto},
    error::{AppError, AppResult},
    models::{Category, Genre},
    repository::Repository,
};

pub type GenreService = named::NamedService<Genre, GenreDto>;
pub type CategoryService = named::NamedService<Category, CategoryDto>;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: author::AuthorService,
    pub books: book::BookService,
    pub book_instances: book_instance::BookInstanceService,
    pub categories: CategoryService,
    pub genres: GenreService,
    pub patrons: patron::PatronService,
    pub publishers: publisher::PublisherService,
}

impl Services {
    /// Create all services over the given repository set
    pub fn new(repository: &Repository) -> Self {
        Self {
            authors: author::AuthorService::new(repository.authors.clone()),
            books: book::BookService::new(repository.books.clone()),
            book_instances: book_instance::BookInstanceService::new(
                repository.book_instances.clone(),
            ),
            categories: CategoryService::new(repository.categories.clone()),
            genres: GenreService::new(repository.genres.clone()),
            patrons: patron::PatronService::new(repository.patrons.clone()),
            publishers: publisher::PublisherService::new(repository.publishers.clone()),
        }
    }
}

/// Ids are generated by the database and always positive
pub(crate) fn check_id(id: i64) -> AppResult<()> {
    if id <= 0 {
        return Err(AppError::InvalidArgument(format!(
            "Invalid argument: {} is not a valid id",
            id
        )));
    }
    Ok(())
}

/// Update and delete need a DTO that refers to a stored row
pub(crate) fn check_identity(id: i64, kind: &str) -> AppResult<()> {
    if id <= 0 {
        return Err(AppError::InvalidArgument(format!(
            "Invalid argument: {} has no id",
            kind
        )));
    }
    Ok(())
}

pub(crate) fn check_text(value: &str, what: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidArgument(format!(
            "Invalid argument: blank {}",
            what
        )));
    }
    Ok(())
}

pub(crate) fn check_ids(ids: &[i64], what: &str) -> AppResult<()> {
    if ids.is_empty() {
        return Err(AppError::InvalidArgument(format!(
            "Invalid argument: empty {}",
            what
        )));
    }
    ids.iter().try_for_each(|id| check_id(*id))
}

/// Runs the derive-generated validation of a DTO
pub(crate) fn check_valid<T: Validate>(dto: &T) -> AppResult<()> {
    dto.validate()
        .map_err(|e| AppError::InvalidArgument(describe_validation_errors(&e)))
}

pub(crate) fn not_found(kind: &str, key: &str, value: impl Display) -> AppError {
    tracing::warn!("{} with {} {} not found", kind, key, value);
    AppError::NotFound(format!("{} with {} {} not found", kind, key, value))
}

pub(crate) fn already_exists(kind: &str, key: &str, value: impl Display) -> AppError {
    tracing::warn!("{} with {} {} already exists", kind, key, value);
    AppError::AlreadyExists(format!("{} with {} {} already exists", kind, key, value))
}

pub(crate) fn save_failed(kind: &str, value: impl Display) -> AppError {
    AppError::Entity(format!(
        "Something went wrong while saving {} {}",
        kind, value
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_check_id() {
        assert_ok!(check_id(1));
        assert_err!(check_id(0));
        assert_err!(check_id(-4));
    }

    #[test]
    fn test_check_text() {
        assert_ok!(check_text("Horror", "name"));
        let err = check_text("  ", "name").unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: blank name");
    }

    #[test]
    fn test_check_ids() {
        assert_ok!(check_ids(&[1, 2], "author ids"));
        assert!(matches!(
            check_ids(&[], "author ids"),
            Err(AppError::InvalidArgument(msg)) if msg == "Invalid argument: empty author ids"
        ));
        assert_err!(check_ids(&[3, 0], "author ids"));
    }

    #[test]
    fn test_messages_name_kind_and_key() {
        assert_eq!(
            already_exists("Genre", "name", "Horror").to_string(),
            "Genre with name Horror already exists"
        );
        assert_eq!(
            not_found("Patron", "card id", "C-001").to_string(),
            "Patron with card id C-001 not found"
        );
    }
}
