//! Author service

use std::sync::Arc;

use super::{check_id, check_identity, check_text, not_found, save_failed};
use crate::{
    dto::AuthorDto,
    error::AppResult,
    models::{Author, Sex},
    repository::{AuthorRepository, CrudRepository},
};

#[derive(Clone)]
pub struct AuthorService {
    repository: Arc<dyn AuthorRepository>,
}

fn to_dtos(authors: Vec<Author>) -> Vec<AuthorDto> {
    authors.into_iter().map(AuthorDto::from).collect()
}

impl AuthorService {
    pub fn new(repository: Arc<dyn AuthorRepository>) -> Self {
        Self { repository }
    }

    /// Stores a new author. Full names are not unique, so there is no
    /// existence check.
    pub async fn save(&self, dto: AuthorDto) -> AppResult<AuthorDto> {
        check_text(&dto.full_name, "full name")?;

        let author = Author::from(dto);
        let saved = self
            .repository
            .save(&author)
            .await
            .ok_or_else(|| save_failed("author", &author.full_name))?;

        tracing::info!("Saved author '{}' with id {}", saved.full_name, saved.id);
        Ok(saved.into())
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<AuthorDto> {
        check_id(id)?;
        tracing::debug!("Looking up author {}", id);
        self.repository
            .find_by_id(id)
            .await
            .map(AuthorDto::from)
            .ok_or_else(|| not_found("Author", "id", id))
    }

    pub async fn find_by_full_name(&self, full_name: &str) -> AppResult<Vec<AuthorDto>> {
        check_text(full_name, "full name")?;
        Ok(to_dtos(self.repository.find_by_full_name(full_name).await))
    }

    pub async fn find_by_full_name_like(&self, full_name: &str) -> AppResult<Vec<AuthorDto>> {
        check_text(full_name, "full name")?;
        Ok(to_dtos(self.repository.find_by_full_name_like(full_name).await))
    }

    pub async fn find_by_sex(&self, sex: Sex) -> Vec<AuthorDto> {
        to_dtos(self.repository.find_by_sex(sex).await)
    }

    pub async fn find_by_book_id(&self, book_id: i64) -> AppResult<Vec<AuthorDto>> {
        check_id(book_id)?;
        Ok(to_dtos(self.repository.find_by_book_id(book_id).await))
    }

    pub async fn find_all(&self) -> Vec<AuthorDto> {
        to_dtos(self.repository.find_all().await)
    }

    pub async fn update(&self, dto: AuthorDto) -> AppResult<AuthorDto> {
        check_identity(dto.id, "author")?;
        check_text(&dto.full_name, "full name")?;

        let id = dto.id;
        let updated = self
            .repository
            .update(&Author::from(dto))
            .await
            .ok_or_else(|| not_found("Author", "id", id))?;

        tracing::info!("Updated author {}", id);
        Ok(updated.into())
    }

    pub async fn delete(&self, dto: &AuthorDto) -> AppResult<()> {
        check_identity(dto.id, "author")?;
        self.delete_by_id(dto.id).await
    }

    pub async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        check_id(id)?;
        if self.repository.find_by_id(id).await.is_none() {
            return Err(not_found("Author", "id", id));
        }
        self.repository.delete_by_id(id).await;
        tracing::info!("Deleted author {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use mockall::{mock, predicate::eq};

    mock! {
        pub AuthorRepo {}

        #[async_trait]
        impl CrudRepository<Author> for AuthorRepo {
            async fn save(&self, entity: &Author) -> Option<Author>;
            async fn find_by_id(&self, id: i64) -> Option<Author>;
            async fn find_all(&self) -> Vec<Author>;
            async fn update(&self, entity: &Author) -> Option<Author>;
            async fn delete_by_id(&self, id: i64);
        }

        #[async_trait]
        impl AuthorRepository for AuthorRepo {
            async fn find_by_full_name(&self, full_name: &str) -> Vec<Author>;
            async fn find_by_full_name_like(&self, full_name: &str) -> Vec<Author>;
            async fn find_by_sex(&self, sex: Sex) -> Vec<Author>;
            async fn find_by_book_id(&self, book_id: i64) -> Vec<Author>;
        }
    }

    fn austen(id: i64) -> Author {
        Author {
            id,
            full_name: "Jane Austen".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1775, 12, 16).unwrap(),
            sex: Sex::Female,
            nationality: "British".to_string(),
        }
    }

    #[tokio::test]
    async fn test_austen_found_by_sex_and_partial_name() {
        let mut mock = MockAuthorRepo::new();
        mock.expect_find_by_sex()
            .with(eq(Sex::Female))
            .returning(|_| vec![austen(1)]);
        mock.expect_find_by_full_name_like()
            .withf(|name: &str| name == "austen")
            .returning(|_| vec![austen(1)]);
        let service = AuthorService::new(Arc::new(mock));

        let by_sex = service.find_by_sex(Sex::Female).await;
        let by_name = service.find_by_full_name_like("austen").await.unwrap();

        assert_eq!(by_sex, vec![AuthorDto::from(austen(1))]);
        assert_eq!(by_sex, by_name);
    }

    #[tokio::test]
    async fn test_save_has_no_existence_check() {
        let mut mock = MockAuthorRepo::new();
        mock.expect_find_by_full_name().never();
        mock.expect_save()
            .times(1)
            .returning(|a: &Author| Some(Author { id: 2, ..a.clone() }));

        let saved = AuthorService::new(Arc::new(mock))
            .save(austen(0).into())
            .await
            .unwrap();
        assert_eq!(saved.id, 2);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let mut mock = MockAuthorRepo::new();
        mock.expect_find_by_id().with(eq(42)).returning(|_| None);

        let err = AuthorService::new(Arc::new(mock))
            .find_by_id(42)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Author with id 42 not found");
    }

    #[tokio::test]
    async fn test_update_of_missing_row_is_not_found() {
        let mut mock = MockAuthorRepo::new();
        mock.expect_update().returning(|_| None);

        let err = AuthorService::new(Arc::new(mock))
            .update(austen(7).into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_blank_name_search_is_invalid() {
        let mut mock = MockAuthorRepo::new();
        mock.expect_find_by_full_name().never();

        let result = AuthorService::new(Arc::new(mock)).find_by_full_name("\t").await;
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }
}
