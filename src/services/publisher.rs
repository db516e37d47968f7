//! Publisher service

use std::sync::Arc;

use super::{
    already_exists, check_id, check_identity, check_text, check_valid, not_found, save_failed,
};
use crate::{
    dto::PublisherDto,
    error::AppResult,
    models::Publisher,
    repository::{CrudRepository, PublisherRepository},
};

#[derive(Clone)]
pub struct PublisherService {
    repository: Arc<dyn PublisherRepository>,
}

impl PublisherService {
    pub fn new(repository: Arc<dyn PublisherRepository>) -> Self {
        Self { repository }
    }

    /// Validates and stores a new publisher; names are unique
    pub async fn save(&self, mut dto: PublisherDto) -> AppResult<PublisherDto> {
        dto.normalize_contacts();
        check_valid(&dto)?;

        if self.repository.find_by_name(&dto.name).await.is_some() {
            return Err(already_exists("Publisher", "name", &dto.name));
        }

        let publisher = Publisher::from(dto);
        let saved = self
            .repository
            .save(&publisher)
            .await
            .ok_or_else(|| save_failed("publisher", &publisher.name))?;

        tracing::info!("Saved publisher '{}' with id {}", saved.name, saved.id);
        Ok(saved.into())
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<PublisherDto> {
        check_id(id)?;
        tracing::debug!("Looking up publisher {}", id);
        self.repository
            .find_by_id(id)
            .await
            .map(PublisherDto::from)
            .ok_or_else(|| not_found("Publisher", "id", id))
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<PublisherDto> {
        check_text(name, "name")?;
        self.repository
            .find_by_name(name)
            .await
            .map(PublisherDto::from)
            .ok_or_else(|| not_found("Publisher", "name", name))
    }

    pub async fn find_by_name_like(&self, name: &str) -> AppResult<Vec<PublisherDto>> {
        check_text(name, "name")?;
        let publishers = self.repository.find_by_name_like(name).await;
        Ok(publishers.into_iter().map(PublisherDto::from).collect())
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<PublisherDto> {
        check_text(email, "email")?;
        self.repository
            .find_by_email(email)
            .await
            .map(PublisherDto::from)
            .ok_or_else(|| not_found("Publisher", "email", email))
    }

    pub async fn find_by_website(&self, website: &str) -> AppResult<PublisherDto> {
        check_text(website, "website")?;
        self.repository
            .find_by_website(website)
            .await
            .map(PublisherDto::from)
            .ok_or_else(|| not_found("Publisher", "website", website))
    }

    pub async fn find_by_address(&self, address: &str) -> AppResult<PublisherDto> {
        check_text(address, "address")?;
        self.repository
            .find_by_address(address)
            .await
            .map(PublisherDto::from)
            .ok_or_else(|| not_found("Publisher", "address", address))
    }

    /// Publisher of a book; a book without one is reported as not found
    pub async fn find_by_book_id(&self, book_id: i64) -> AppResult<PublisherDto> {
        check_id(book_id)?;
        self.repository
            .find_by_book_id(book_id)
            .await
            .map(PublisherDto::from)
            .ok_or_else(|| not_found("Publisher", "book id", book_id))
    }

    pub async fn find_all(&self) -> Vec<PublisherDto> {
        self.repository
            .find_all()
            .await
            .into_iter()
            .map(PublisherDto::from)
            .collect()
    }

    pub async fn update(&self, mut dto: PublisherDto) -> AppResult<PublisherDto> {
        check_identity(dto.id, "publisher")?;
        dto.normalize_contacts();
        check_valid(&dto)?;

        let id = dto.id;
        let updated = self
            .repository
            .update(&Publisher::from(dto))
            .await
            .ok_or_else(|| not_found("Publisher", "id", id))?;

        tracing::info!("Updated publisher {}", id);
        Ok(updated.into())
    }

    pub async fn delete(&self, dto: &PublisherDto) -> AppResult<()> {
        check_identity(dto.id, "publisher")?;
        self.delete_by_id(dto.id).await
    }

    pub async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        check_id(id)?;
        if self.repository.find_by_id(id).await.is_none() {
            return Err(not_found("Publisher", "id", id));
        }
        self.repository.delete_by_id(id).await;
        tracing::info!("Deleted publisher {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use async_trait::async_trait;
    use chrono::{Duration, Local, NaiveDate};
    use mockall::mock;

    mock! {
        pub PublisherRepo {}

        #[async_trait]
        impl CrudRepository<Publisher> for PublisherRepo {
            async fn save(&self, entity: &Publisher) -> Option<Publisher>;
            async fn find_by_id(&self, id: i64) -> Option<Publisher>;
            async fn find_all(&self) -> Vec<Publisher>;
            async fn update(&self, entity: &Publisher) -> Option<Publisher>;
            async fn delete_by_id(&self, id: i64);
        }

        #[async_trait]
        impl PublisherRepository for PublisherRepo {
            async fn find_by_name(&self, name: &str) -> Option<Publisher>;
            async fn find_by_name_like(&self, name: &str) -> Vec<Publisher>;
            async fn find_by_email(&self, email: &str) -> Option<Publisher>;
            async fn find_by_website(&self, website: &str) -> Option<Publisher>;
            async fn find_by_address(&self, address: &str) -> Option<Publisher>;
            async fn find_by_book_id(&self, book_id: i64) -> Option<Publisher>;
        }
    }

    fn penguin() -> PublisherDto {
        PublisherDto {
            id: 0,
            name: "Penguin".to_string(),
            foundation_date: NaiveDate::from_ymd_opt(1935, 7, 30).unwrap(),
            address: Some("  ".to_string()),
            email: Some("info@penguin.co.uk".to_string()),
            website: None,
        }
    }

    #[tokio::test]
    async fn test_future_foundation_date_fails_before_repository() {
        let mut mock = MockPublisherRepo::new();
        mock.expect_find_by_name().never();
        mock.expect_save().never();

        let dto = PublisherDto {
            foundation_date: Local::now().date_naive() + Duration::days(30),
            ..penguin()
        };
        let err = PublisherService::new(Arc::new(mock)).save(dto).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidArgument(_)));
        assert_eq!(
            err.to_string(),
            "Validation failed: foundation_date cannot be in the future"
        );
    }

    #[tokio::test]
    async fn test_blank_contacts_are_saved_as_absent() {
        let mut mock = MockPublisherRepo::new();
        mock.expect_find_by_name().returning(|_| None);
        mock.expect_save()
            .withf(|p: &Publisher| p.address.is_none() && p.email.is_some())
            .times(1)
            .returning(|p: &Publisher| Some(Publisher { id: 4, ..p.clone() }));

        let saved = PublisherService::new(Arc::new(mock)).save(penguin()).await.unwrap();
        assert_eq!(saved.id, 4);
        assert_eq!(saved.address, None);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let mut mock = MockPublisherRepo::new();
        mock.expect_find_by_name()
            .withf(|name: &str| name == "Penguin")
            .returning(|_| Some(Publisher::from(PublisherDto { id: 4, ..penguin() })));
        mock.expect_save().never();

        let err = PublisherService::new(Arc::new(mock)).save(penguin()).await.unwrap_err();
        assert_eq!(err.to_string(), "Publisher with name Penguin already exists");
    }

    #[tokio::test]
    async fn test_missing_email_reports_key() {
        let mut mock = MockPublisherRepo::new();
        mock.expect_find_by_email().returning(|_| None);

        let err = PublisherService::new(Arc::new(mock))
            .find_by_email("nobody@example.org")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Publisher with email nobody@example.org not found"
        );
    }

    #[tokio::test]
    async fn test_update_revalidates() {
        let mut mock = MockPublisherRepo::new();
        mock.expect_update().never();

        let dto = PublisherDto {
            id: 4,
            name: " ".to_string(),
            ..penguin()
        };
        let err = PublisherService::new(Arc::new(mock)).update(dto).await.unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: name cannot be blank");
    }
}
