//! Book service

use std::sync::Arc;

use super::{
    already_exists, check_id, check_identity, check_ids, check_text, check_valid, not_found,
    save_failed,
};
use crate::{
    dto::BookDto,
    error::AppResult,
    models::{Book, Format, Status},
    repository::{BookRepository, CrudRepository},
};

#[derive(Clone)]
pub struct BookService {
    repository: Arc<dyn BookRepository>,
}

fn to_dtos(books: Vec<Book>) -> Vec<BookDto> {
    books.into_iter().map(BookDto::from).collect()
}

/// Authors, genres, categories and publisher must already be stored
fn check_references(dto: &BookDto) -> AppResult<()> {
    dto.authors
        .iter()
        .try_for_each(|a| check_identity(a.id, "author"))?;
    dto.genres
        .iter()
        .try_for_each(|g| check_identity(g.id, "genre"))?;
    dto.categories
        .iter()
        .try_for_each(|c| check_identity(c.id, "category"))?;
    dto.publisher
        .iter()
        .try_for_each(|p| check_identity(p.id, "publisher"))
}

impl BookService {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    /// Validates and stores a new book with its associations. The ISBN is
    /// the natural key.
    pub async fn save(&self, dto: BookDto) -> AppResult<BookDto> {
        check_valid(&dto)?;
        check_references(&dto)?;

        if self.repository.find_by_isbn(&dto.isbn).await.is_some() {
            return Err(already_exists("Book", "isbn", &dto.isbn));
        }

        let book = Book::from(dto);
        let saved = self
            .repository
            .save(&book)
            .await
            .ok_or_else(|| save_failed("book", &book.title))?;

        tracing::info!(
            "Saved book '{}' (isbn {}) with id {}",
            saved.title,
            saved.isbn,
            saved.id
        );
        Ok(saved.into())
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<BookDto> {
        check_id(id)?;
        tracing::debug!("Looking up book {}", id);
        self.repository
            .find_by_id(id)
            .await
            .map(BookDto::from)
            .ok_or_else(|| not_found("Book", "id", id))
    }

    pub async fn find_by_isbn(&self, isbn: &str) -> AppResult<BookDto> {
        check_text(isbn, "isbn")?;
        self.repository
            .find_by_isbn(isbn)
            .await
            .map(BookDto::from)
            .ok_or_else(|| not_found("Book", "isbn", isbn))
    }

    pub async fn find_by_title_like(&self, title: &str) -> AppResult<Vec<BookDto>> {
        check_text(title, "title")?;
        Ok(to_dtos(self.repository.find_by_title_like(title).await))
    }

    /// Books written by all of the given authors together
    pub async fn find_by_author_ids(&self, author_ids: &[i64]) -> AppResult<Vec<BookDto>> {
        check_ids(author_ids, "author ids")?;
        Ok(to_dtos(self.repository.find_by_author_ids(author_ids).await))
    }

    pub async fn find_by_genre_ids(&self, genre_ids: &[i64]) -> AppResult<Vec<BookDto>> {
        check_ids(genre_ids, "genre ids")?;
        Ok(to_dtos(self.repository.find_by_genre_ids(genre_ids).await))
    }

    pub async fn find_by_category_ids(&self, category_ids: &[i64]) -> AppResult<Vec<BookDto>> {
        check_ids(category_ids, "category ids")?;
        Ok(to_dtos(self.repository.find_by_category_ids(category_ids).await))
    }

    pub async fn find_by_language(&self, language: &str) -> AppResult<Vec<BookDto>> {
        check_text(language, "language")?;
        Ok(to_dtos(self.repository.find_by_language(language).await))
    }

    pub async fn find_by_publisher_id(&self, publisher_id: i64) -> AppResult<Vec<BookDto>> {
        check_id(publisher_id)?;
        Ok(to_dtos(self.repository.find_by_publisher_id(publisher_id).await))
    }

    pub async fn find_by_status(&self, status: Status) -> Vec<BookDto> {
        to_dtos(self.repository.find_by_status(status).await)
    }

    pub async fn find_by_format(&self, format: Format) -> Vec<BookDto> {
        to_dtos(self.repository.find_by_format(format).await)
    }

    pub async fn find_all(&self) -> Vec<BookDto> {
        to_dtos(self.repository.find_all().await)
    }

    /// Rewrites the book and replaces its association sets
    pub async fn update(&self, dto: BookDto) -> AppResult<BookDto> {
        check_identity(dto.id, "book")?;
        check_valid(&dto)?;
        check_references(&dto)?;

        let id = dto.id;
        let updated = self
            .repository
            .update(&Book::from(dto))
            .await
            .ok_or_else(|| not_found("Book", "id", id))?;

        tracing::info!("Updated book {}", id);
        Ok(updated.into())
    }

    pub async fn delete(&self, dto: &BookDto) -> AppResult<()> {
        check_identity(dto.id, "book")?;
        self.delete_by_id(dto.id).await
    }

    /// Deletes the book; its copies go with it
    pub async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        check_id(id)?;
        if self.repository.find_by_id(id).await.is_none() {
            return Err(not_found("Book", "id", id));
        }
        self.repository.delete_by_id(id).await;
        tracing::info!("Deleted book {}", id);
        Ok(())
    }
}
