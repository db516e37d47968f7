//! Genre and category service
//!
//! Both kinds are a unique name plus a description, so one service body
//! serves them; [`GenreService`](super::GenreService) and
//! [`CategoryService`](super::CategoryService) name the two instances.

use std::{marker::PhantomData, sync::Arc};

use super::{already_exists, check_id, check_identity, check_text, not_found, save_failed};
use crate::{
    error::AppResult,
    repository::{CrudRepository, NamedEntity, NamedRepository},
};

pub struct NamedService<E: NamedEntity, D> {
    repository: Arc<dyn NamedRepository<E>>,
    dto: PhantomData<fn() -> D>,
}

impl<E: NamedEntity, D> Clone for NamedService<E, D> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            dto: PhantomData,
        }
    }
}

impl<E, D> NamedService<E, D>
where
    E: NamedEntity + From<D>,
    D: From<E> + Clone,
{
    pub fn new(repository: Arc<dyn NamedRepository<E>>) -> Self {
        Self {
            repository,
            dto: PhantomData,
        }
    }

    fn kind() -> String {
        E::KIND.to_lowercase()
    }

    /// Stores a new row; names are unique
    pub async fn save(&self, dto: D) -> AppResult<D> {
        let entity = E::from(dto);
        check_text(entity.name(), "name")?;

        if self.repository.find_by_name(entity.name()).await.is_some() {
            return Err(already_exists(E::KIND, "name", entity.name()));
        }

        let saved = self
            .repository
            .save(&entity)
            .await
            .ok_or_else(|| save_failed(&Self::kind(), entity.name()))?;

        tracing::info!("Saved {} '{}' with id {}", Self::kind(), saved.name(), saved.id());
        Ok(saved.into())
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<D> {
        check_id(id)?;
        tracing::debug!("Looking up {} {}", Self::kind(), id);
        self.repository
            .find_by_id(id)
            .await
            .map(D::from)
            .ok_or_else(|| not_found(E::KIND, "id", id))
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<D> {
        check_text(name, "name")?;
        self.repository
            .find_by_name(name)
            .await
            .map(D::from)
            .ok_or_else(|| not_found(E::KIND, "name", name))
    }

    pub async fn find_by_name_like(&self, name: &str) -> AppResult<Vec<D>> {
        check_text(name, "name")?;
        let rows = self.repository.find_by_name_like(name).await;
        Ok(rows.into_iter().map(D::from).collect())
    }

    pub async fn find_by_book_id(&self, book_id: i64) -> AppResult<Vec<D>> {
        check_id(book_id)?;
        let rows = self.repository.find_by_book_id(book_id).await;
        Ok(rows.into_iter().map(D::from).collect())
    }

    pub async fn find_all(&self) -> Vec<D> {
        self.repository
            .find_all()
            .await
            .into_iter()
            .map(D::from)
            .collect()
    }

    pub async fn update(&self, dto: D) -> AppResult<D> {
        let entity = E::from(dto);
        check_identity(entity.id(), &Self::kind())?;
        check_text(entity.name(), "name")?;

        let id = entity.id();
        let updated = self
            .repository
            .update(&entity)
            .await
            .ok_or_else(|| not_found(E::KIND, "id", id))?;

        tracing::info!("Updated {} {}", Self::kind(), id);
        Ok(updated.into())
    }

    pub async fn delete(&self, dto: &D) -> AppResult<()> {
        let id = E::from(dto.clone()).id();
        check_identity(id, &Self::kind())?;
        self.delete_by_id(id).await
    }

    pub async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        check_id(id)?;
        if self.repository.find_by_id(id).await.is_none() {
            return Err(not_found(E::KIND, "id", id));
        }
        self.repository.delete_by_id(id).await;
        tracing::info!("Deleted {} {}", Self::kind(), id);
        Ok(())
    }
}
