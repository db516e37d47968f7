//! API handlers for Shelfmark REST endpoints
//!
//! List endpoints take optional filters; when several are supplied the first
//! one in the order documented on each query struct wins.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod categories;
pub mod genres;
pub mod health;
pub mod openapi;
pub mod patrons;
pub mod publishers;

use crate::error::{AppError, AppResult};

/// Parses a comma-separated id list such as `1,4,7`
pub(crate) fn parse_id_list(raw: &str, what: &str) -> AppResult<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>().map_err(|_| {
                AppError::InvalidArgument(format!(
                    "Invalid argument: '{}' in {} is not an id",
                    part, what
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_list() {
        assert_eq!(parse_id_list("1, 4,7", "author_ids").unwrap(), vec![1, 4, 7]);
        assert!(parse_id_list("", "author_ids").unwrap().is_empty());
    }

    #[test]
    fn test_parse_id_list_rejects_garbage() {
        let err = parse_id_list("1,x", "genre_ids").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument: 'x' in genre_ids is not an id"
        );
    }
}
