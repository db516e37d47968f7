//! Publisher DTO

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{blank_to_none, not_blank, not_in_future};
use crate::models::Publisher;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
pub struct PublisherDto {
    #[serde(default)]
    pub id: i64,
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[validate(custom(function = "not_in_future"))]
    pub foundation_date: NaiveDate,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl PublisherDto {
    /// Blank contact fields are stored as absent so they never collide on
    /// the unique columns.
    pub fn normalize_contacts(&mut self) {
        self.address = blank_to_none(self.address.take());
        self.email = blank_to_none(self.email.take());
        self.website = blank_to_none(self.website.take());
    }
}

impl From<Publisher> for PublisherDto {
    fn from(p: Publisher) -> Self {
        Self {
            id: p.id,
            name: p.name,
            foundation_date: p.foundation_date,
            address: p.address,
            email: p.email,
            website: p.website,
        }
    }
}

impl From<PublisherDto> for Publisher {
    fn from(dto: PublisherDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            foundation_date: dto.foundation_date,
            address: dto.address,
            email: dto.email,
            website: dto.website,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::describe_validation_errors;
    use chrono::{Duration, Local};

    fn penguin() -> PublisherDto {
        PublisherDto {
            id: 0,
            name: "Penguin".to_string(),
            foundation_date: NaiveDate::from_ymd_opt(1935, 7, 30).unwrap(),
            address: Some("20 Vauxhall Bridge Road, London".to_string()),
            email: None,
            website: Some("https://www.penguin.co.uk".to_string()),
        }
    }

    #[test]
    fn test_valid_publisher() {
        assert!(penguin().validate().is_ok());
    }

    #[test]
    fn test_future_foundation_date_rejected() {
        let dto = PublisherDto {
            foundation_date: Local::now().date_naive() + Duration::days(30),
            ..penguin()
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(
            describe_validation_errors(&errors),
            "Validation failed: foundation_date cannot be in the future"
        );
    }

    #[test]
    fn test_all_violations_reported() {
        let dto = PublisherDto {
            name: " ".to_string(),
            foundation_date: Local::now().date_naive() + Duration::days(1),
            ..penguin()
        };
        let errors = dto.validate().unwrap_err();
        assert_eq!(
            describe_validation_errors(&errors),
            "Validation failed: foundation_date cannot be in the future; name cannot be blank"
        );
    }

    #[test]
    fn test_normalize_contacts() {
        let mut dto = PublisherDto {
            address: Some("".to_string()),
            email: Some("   ".to_string()),
            ..penguin()
        };
        dto.normalize_contacts();
        assert_eq!(dto.address, None);
        assert_eq!(dto.email, None);
        assert_eq!(dto.website.as_deref(), Some("https://www.penguin.co.uk"));
    }
}
