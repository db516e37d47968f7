//! Book instance service

use std::sync::Arc;

use super::{check_id, check_identity, not_found, save_failed};
use crate::{
    dto::BookInstanceDto,
    error::{AppError, AppResult},
    models::{BookInstance, Format, Status},
    repository::{BookInstanceRepository, CrudRepository},
};

#[derive(Clone)]
pub struct BookInstanceService {
    repository: Arc<dyn BookInstanceRepository>,
}

/// Copies always come back with their book; one that doesn't is skipped
fn to_dtos(instances: Vec<BookInstance>) -> Vec<BookInstanceDto> {
    instances
        .into_iter()
        .filter_map(BookInstanceDto::try_from_model)
        .collect()
}

fn to_dto(instance: BookInstance) -> AppResult<BookInstanceDto> {
    let id = instance.id;
    BookInstanceDto::try_from_model(instance)
        .ok_or_else(|| AppError::Internal(format!("Book instance {} loaded without its book", id)))
}

impl BookInstanceService {
    pub fn new(repository: Arc<dyn BookInstanceRepository>) -> Self {
        Self { repository }
    }

    /// Stores a new copy of an already stored book
    pub async fn save(&self, dto: BookInstanceDto) -> AppResult<BookInstanceDto> {
        check_identity(dto.book.id, "book")?;

        let instance = BookInstance::from(dto);
        let saved = self
            .repository
            .save(&instance)
            .await
            .ok_or_else(|| save_failed("a copy of book", instance.book_id))?;

        tracing::info!(
            "Saved copy {} of book {}",
            saved.id,
            saved.book_id
        );
        to_dto(saved)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<BookInstanceDto> {
        check_id(id)?;
        tracing::debug!("Looking up book instance {}", id);
        let instance = self
            .repository
            .find_by_id(id)
            .await
            .ok_or_else(|| not_found("Book instance", "id", id))?;
        to_dto(instance)
    }

    pub async fn find_by_book_id(&self, book_id: i64) -> AppResult<Vec<BookInstanceDto>> {
        check_id(book_id)?;
        Ok(to_dtos(self.repository.find_by_book_id(book_id).await))
    }

    pub async fn find_by_publisher_id(&self, publisher_id: i64) -> AppResult<Vec<BookInstanceDto>> {
        check_id(publisher_id)?;
        Ok(to_dtos(self.repository.find_by_publisher_id(publisher_id).await))
    }

    pub async fn find_by_status(&self, status: Status) -> Vec<BookInstanceDto> {
        to_dtos(self.repository.find_by_status(status).await)
    }

    pub async fn find_by_format(&self, format: Format) -> Vec<BookInstanceDto> {
        to_dtos(self.repository.find_by_format(format).await)
    }

    pub async fn find_all(&self) -> Vec<BookInstanceDto> {
        to_dtos(self.repository.find_all().await)
    }

    pub async fn update(&self, dto: BookInstanceDto) -> AppResult<BookInstanceDto> {
        check_identity(dto.id, "book instance")?;
        check_identity(dto.book.id, "book")?;

        let id = dto.id;
        let updated = self
            .repository
            .update(&BookInstance::from(dto))
            .await
            .ok_or_else(|| not_found("Book instance", "id", id))?;

        tracing::info!("Updated book instance {}", id);
        to_dto(updated)
    }

    pub async fn delete(&self, dto: &BookInstanceDto) -> AppResult<()> {
        check_identity(dto.id, "book instance")?;
        self.delete_by_id(dto.id).await
    }

    pub async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        check_id(id)?;
        if self.repository.find_by_id(id).await.is_none() {
            return Err(not_found("Book instance", "id", id));
        }
        self.repository.delete_by_id(id).await;
        tracing::info!("Deleted book instance {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dto::{book::fixtures::pride_and_prejudice, BookDto},
        models::Book,
    };
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use mockall::{mock, predicate::eq};

    mock! {
        pub BookInstanceRepo {}

        #[async_trait]
        impl CrudRepository<BookInstance> for BookInstanceRepo {
            async fn save(&self, entity: &BookInstance) -> Option<BookInstance>;
            async fn find_by_id(&self, id: i64) -> Option<BookInstance>;
            async fn find_all(&self) -> Vec<BookInstance>;
            async fn update(&self, entity: &BookInstance) -> Option<BookInstance>;
            async fn delete_by_id(&self, id: i64);
        }

        #[async_trait]
        impl BookInstanceRepository for BookInstanceRepo {
            async fn find_by_book_id(&self, book_id: i64) -> Vec<BookInstance>;
            async fn find_by_publisher_id(&self, publisher_id: i64) -> Vec<BookInstance>;
            async fn find_by_status(&self, status: Status) -> Vec<BookInstance>;
            async fn find_by_format(&self, format: Format) -> Vec<BookInstance>;
        }
    }

    fn stored_book() -> BookDto {
        BookDto {
            id: 10,
            ..pride_and_prejudice()
        }
    }

    fn copy(id: i64) -> BookInstanceDto {
        let book = stored_book();
        BookInstanceDto {
            id,
            publisher: book.publisher.clone(),
            book,
            number_of_pages: 482,
            receipt_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            status: Status::Available,
            format: Format::Hardcover,
        }
    }

    #[tokio::test]
    async fn test_save_returns_copy_with_book() {
        let mut mock = MockBookInstanceRepo::new();
        mock.expect_save()
            .withf(|i: &BookInstance| i.book_id == 10 && i.publisher_id == Some(4))
            .times(1)
            .returning(|i: &BookInstance| Some(BookInstance { id: 3, ..i.clone() }));

        let saved = BookInstanceService::new(Arc::new(mock))
            .save(copy(0))
            .await
            .unwrap();

        assert_eq!(saved, copy(3));
    }

    #[tokio::test]
    async fn test_copy_of_unsaved_book_is_invalid() {
        let mut mock = MockBookInstanceRepo::new();
        mock.expect_save().never();

        let dto = BookInstanceDto {
            book: pride_and_prejudice(),
            ..copy(0)
        };
        let err = BookInstanceService::new(Arc::new(mock)).save(dto).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: book has no id");
    }

    #[tokio::test]
    async fn test_listing_skips_copies_without_book() {
        let orphan = BookInstance {
            book: None,
            ..BookInstance::from(copy(8))
        };
        let mut mock = MockBookInstanceRepo::new();
        mock.expect_find_by_status()
            .with(eq(Status::Available))
            .return_once(move |_| vec![BookInstance::from(copy(7)), orphan]);

        let copies = BookInstanceService::new(Arc::new(mock))
            .find_by_status(Status::Available)
            .await;

        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].id, 7);
        assert_eq!(Book::from(copies[0].book.clone()).id, 10);
    }

    #[tokio::test]
    async fn test_delete_of_missing_copy_is_not_found() {
        let mut mock = MockBookInstanceRepo::new();
        mock.expect_find_by_id().returning(|_| None);
        mock.expect_delete_by_id().never();

        let err = BookInstanceService::new(Arc::new(mock))
            .delete(&copy(12))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Book instance with id 12 not found");
    }
}
