//! Patron service

use std::sync::Arc;

use super::{
    already_exists, check_id, check_identity, check_ids, check_text, not_found, save_failed,
};
use crate::{
    dto::PatronDto,
    error::AppResult,
    models::Patron,
    repository::{CrudRepository, PatronRepository},
};

#[derive(Clone)]
pub struct PatronService {
    repository: Arc<dyn PatronRepository>,
}

impl PatronService {
    pub fn new(repository: Arc<dyn PatronRepository>) -> Self {
        Self { repository }
    }

    /// Registers a new patron; card ids are unique
    pub async fn save(&self, dto: PatronDto) -> AppResult<PatronDto> {
        check_text(&dto.card_id, "card id")?;
        if !dto.book_instance_ids.is_empty() {
            check_ids(&dto.book_instance_ids, "book instance ids")?;
        }

        if self.repository.find_by_card_id(&dto.card_id).await.is_some() {
            return Err(already_exists("Patron", "card id", &dto.card_id));
        }

        let patron = Patron::from(dto);
        let saved = self
            .repository
            .save(&patron)
            .await
            .ok_or_else(|| save_failed("patron", &patron.card_id))?;

        tracing::info!("Registered patron '{}' with id {}", saved.card_id, saved.id);
        Ok(saved.into())
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<PatronDto> {
        check_id(id)?;
        tracing::debug!("Looking up patron {}", id);
        self.repository
            .find_by_id(id)
            .await
            .map(PatronDto::from)
            .ok_or_else(|| not_found("Patron", "id", id))
    }

    pub async fn find_by_card_id(&self, card_id: &str) -> AppResult<PatronDto> {
        check_text(card_id, "card id")?;
        self.repository
            .find_by_card_id(card_id)
            .await
            .map(PatronDto::from)
            .ok_or_else(|| not_found("Patron", "card id", card_id))
    }

    /// Patron currently holding the given copy
    pub async fn find_by_book_instance_id(&self, book_instance_id: i64) -> AppResult<PatronDto> {
        check_id(book_instance_id)?;
        self.repository
            .find_by_book_instance_id(book_instance_id)
            .await
            .map(PatronDto::from)
            .ok_or_else(|| not_found("Patron", "book instance id", book_instance_id))
    }

    pub async fn find_by_full_name_like(&self, full_name: &str) -> AppResult<Vec<PatronDto>> {
        check_text(full_name, "full name")?;
        let patrons = self.repository.find_by_full_name_like(full_name).await;
        Ok(patrons.into_iter().map(PatronDto::from).collect())
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<PatronDto> {
        check_text(email, "email")?;
        self.repository
            .find_by_email(email)
            .await
            .map(PatronDto::from)
            .ok_or_else(|| not_found("Patron", "email", email))
    }

    pub async fn find_by_phone(&self, phone: &str) -> AppResult<PatronDto> {
        check_text(phone, "phone")?;
        self.repository
            .find_by_phone(phone)
            .await
            .map(PatronDto::from)
            .ok_or_else(|| not_found("Patron", "phone", phone))
    }

    pub async fn find_by_address(&self, address: &str) -> AppResult<PatronDto> {
        check_text(address, "address")?;
        self.repository
            .find_by_address(address)
            .await
            .map(PatronDto::from)
            .ok_or_else(|| not_found("Patron", "address", address))
    }

    pub async fn find_all(&self) -> Vec<PatronDto> {
        self.repository
            .find_all()
            .await
            .into_iter()
            .map(PatronDto::from)
            .collect()
    }

    /// Rewrites the patron and replaces the set of copies recorded against it
    pub async fn update(&self, dto: PatronDto) -> AppResult<PatronDto> {
        check_identity(dto.id, "patron")?;
        check_text(&dto.card_id, "card id")?;
        if !dto.book_instance_ids.is_empty() {
            check_ids(&dto.book_instance_ids, "book instance ids")?;
        }

        let id = dto.id;
        let updated = self
            .repository
            .update(&Patron::from(dto))
            .await
            .ok_or_else(|| not_found("Patron", "id", id))?;

        tracing::info!("Updated patron {}", id);
        Ok(updated.into())
    }

    pub async fn delete(&self, dto: &PatronDto) -> AppResult<()> {
        check_identity(dto.id, "patron")?;
        self.delete_by_id(dto.id).await
    }

    pub async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        check_id(id)?;
        if self.repository.find_by_id(id).await.is_none() {
            return Err(not_found("Patron", "id", id));
        }
        self.repository.delete_by_id(id).await;
        tracing::info!("Deleted patron {}", id);
        Ok(())
    }
}
