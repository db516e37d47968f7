//! Shared domain enums, stored as PostgreSQL enum types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// Sex
// ---------------------------------------------------------------------------

/// Author sex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "sex", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sex {
    Male,
    Female,
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Sex::Male => "MALE",
            Sex::Female => "FEMALE",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lending status of a book or one of its copies.
///
/// No operation moves a copy between these states yet; the value is set on
/// create/update only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "book_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Available,
    NotAvailable,
    CheckedOut,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Status::Available => "AVAILABLE",
            Status::NotAvailable => "NOT_AVAILABLE",
            Status::CheckedOut => "CHECKED_OUT",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// Format
// ---------------------------------------------------------------------------

/// Physical binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[sqlx(type_name = "book_format", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Format {
    Hardcover,
    Paperback,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Format::Hardcover => "HARDCOVER",
            Format::Paperback => "PAPERBACK",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_uses_upper_snake_case() {
        assert_eq!(serde_json::to_string(&Status::NotAvailable).unwrap(), "\"NOT_AVAILABLE\"");
        assert_eq!(serde_json::from_str::<Sex>("\"FEMALE\"").unwrap(), Sex::Female);
        assert_eq!(serde_json::from_str::<Format>("\"PAPERBACK\"").unwrap(), Format::Paperback);
    }

    #[test]
    fn test_display_matches_wire_name() {
        assert_eq!(Status::CheckedOut.to_string(), "CHECKED_OUT");
        assert_eq!(Format::Hardcover.to_string(), "HARDCOVER");
        assert_eq!(Sex::Male.to_string(), "MALE");
    }
}
