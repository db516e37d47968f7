//! Repository layer for database operations
//!
//! Every operation checks out its own pooled connection, and every write runs
//! in its own transaction. A transaction dropped before `commit` is rolled
//! back, so an early `?` inside a write leaves nothing behind.
//!
//! Repository methods never hand a database error to their caller: the error
//! is logged here and the caller sees an empty result (`None`, an empty `Vec`,
//! or nothing at all for deletes).

/// Logs a failed `sqlx::Result` and converts it to an `Option`
macro_rules! logged {
    ($result:expr, $($action:tt)+) => {
        match $result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Persistence error while {}: {}", format_args!($($action)+), e);
                None
            }
        }
    };
}

pub mod author;
pub mod book;
pub mod book_instance;
pub mod named;
pub mod patron;
pub mod publisher;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Category, Genre},
};

pub use author::{AuthorRepository, PgAuthorRepository};
pub use book::{BookRepository, PgBookRepository};
pub use book_instance::{BookInstanceRepository, PgBookInstanceRepository};
pub use named::{
    NamedEntity, NamedRepository, PgCategoryRepository, PgGenreRepository, PgNamedRepository,
};
pub use patron::{PatronRepository, PgPatronRepository};
pub use publisher::{PgPublisherRepository, PublisherRepository};

/// Operations every entity repository supports
#[async_trait]
pub trait CrudRepository<E>: Send + Sync {
    /// Inserts the entity and returns it with its generated id
    async fn save(&self, entity: &E) -> Option<E>;

    async fn find_by_id(&self, id: i64) -> Option<E>;

    /// All rows, ordered by id
    async fn find_all(&self) -> Vec<E>;

    /// Rewrites the row carrying the entity's id. `None` when no such row
    /// exists; never inserts.
    async fn update(&self, entity: &E) -> Option<E>;

    /// Deletes the row if present; a missing row is not an error
    async fn delete_by_id(&self, id: i64);
}

/// Turns a search term into an `ILIKE` pattern matching any value containing
/// it. Case is left to the database; wildcards in the term match literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Sorted, de-duplicated copy of an id list
pub(crate) fn distinct_ids(ids: &[i64]) -> Vec<i64> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub authors: Arc<dyn AuthorRepository>,
    pub books: Arc<dyn BookRepository>,
    pub book_instances: Arc<dyn BookInstanceRepository>,
    pub categories: Arc<dyn NamedRepository<Category>>,
    pub genres: Arc<dyn NamedRepository<Genre>>,
    pub patrons: Arc<dyn PatronRepository>,
    pub publishers: Arc<dyn PublisherRepository>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(PgAuthorRepository::new(pool.clone())),
            books: Arc::new(PgBookRepository::new(pool.clone())),
            book_instances: Arc::new(PgBookInstanceRepository::new(pool.clone())),
            categories: Arc::new(PgCategoryRepository::new(pool.clone())),
            genres: Arc::new(PgGenreRepository::new(pool.clone())),
            patrons: Arc::new(PgPatronRepository::new(pool.clone())),
            publishers: Arc::new(PgPublisherRepository::new(pool.clone())),
            pool,
        }
    }

    /// Round-trips a trivial query to check database connectivity
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_keeps_case_for_ilike() {
        assert_eq!(like_pattern("Austen"), "%Austen%");
        assert_eq!(like_pattern("ÉMILE"), "%ÉMILE%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("100%_sure"), "%100\\%\\_sure%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_distinct_ids() {
        assert_eq!(distinct_ids(&[3, 1, 3, 2, 1]), vec![1, 2, 3]);
        assert!(distinct_ids(&[]).is_empty());
    }
}
