//! Data-transfer objects exchanged with API clients, and their mapping to
//! and from the persisted models

pub mod author;
pub mod book;
pub mod book_instance;
pub mod category;
pub mod genre;
pub mod patron;
pub mod publisher;

use chrono::{Local, NaiveDate};
use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

pub use author::AuthorDto;
pub use book::BookDto;
pub use book_instance::BookInstanceDto;
pub use category::CategoryDto;
pub use genre::GenreDto;
pub use patron::PatronDto;
pub use publisher::PublisherDto;

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Rejects empty and whitespace-only strings
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(validation_error("blank", "cannot be blank"));
    }
    Ok(())
}

/// Rejects dates after today (local calendar)
pub fn not_in_future(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Local::now().date_naive() {
        return Err(validation_error("future_date", "cannot be in the future"));
    }
    Ok(())
}

/// Flattens validator output into a single `Validation failed: a; b` line,
/// fields in alphabetical order.
pub fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut problems: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter()
                .map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{} {}", field, message)
                })
                .collect::<Vec<_>>()
        })
        .collect();
    problems.sort();
    format!("Validation failed: {}", problems.join("; "))
}

/// `None` for blank optional strings, the trimmed value otherwise
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("Dune").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank("   \t").is_err());
    }

    #[test]
    fn test_not_in_future() {
        let today = Local::now().date_naive();
        assert!(not_in_future(&today).is_ok());
        assert!(not_in_future(&(today - Duration::days(3650))).is_ok());
        assert!(not_in_future(&(today + Duration::days(1))).is_err());
    }

    #[test]
    fn test_blank_to_none() {
        assert_eq!(blank_to_none(None), None);
        assert_eq!(blank_to_none(Some("  ".to_string())), None);
        assert_eq!(
            blank_to_none(Some(" info@penguin.co.uk ".to_string())),
            Some("info@penguin.co.uk".to_string())
        );
    }
}
