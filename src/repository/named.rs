//! Persistence for named book classifiers
//!
//! Genres and categories share one shape: a unique `name`, a `description`,
//! and a `book_<table>` join table linking them to books. Both are served by
//! [`PgNamedRepository`], parameterised by the entity.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, FromRow, Pool, Postgres};
use std::marker::PhantomData;

use super::{like_pattern, CrudRepository};
use crate::models::{Category, Genre};

/// A row with a unique name, stored in its own table and linked to books
pub trait NamedEntity:
    for<'r> FromRow<'r, PgRow> + Clone + Send + Sync + Unpin + 'static
{
    /// Capitalised kind, as it appears in messages
    const KIND: &'static str;
    const TABLE: &'static str;
    /// Join table towards `books`
    const LINK_TABLE: &'static str;
    /// Column of `LINK_TABLE` holding this entity's id
    const LINK_COLUMN: &'static str;

    fn id(&self) -> i64;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
}

impl NamedEntity for Genre {
    const KIND: &'static str = "Genre";
    const TABLE: &'static str = "genres";
    const LINK_TABLE: &'static str = "book_genres";
    const LINK_COLUMN: &'static str = "genre_id";

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl NamedEntity for Category {
    const KIND: &'static str = "Category";
    const TABLE: &'static str = "categories";
    const LINK_TABLE: &'static str = "book_categories";
    const LINK_COLUMN: &'static str = "category_id";

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[async_trait]
pub trait NamedRepository<E: NamedEntity>: CrudRepository<E> {
    /// Exact, case-sensitive name match
    async fn find_by_name(&self, name: &str) -> Option<E>;

    /// Rows whose name contains `name`, ignoring case
    async fn find_by_name_like(&self, name: &str) -> Vec<E>;

    /// Rows attached to the given book
    async fn find_by_book_id(&self, book_id: i64) -> Vec<E>;
}

pub struct PgNamedRepository<E> {
    pool: Pool<Postgres>,
    entity: PhantomData<fn() -> E>,
}

pub type PgGenreRepository = PgNamedRepository<Genre>;
pub type PgCategoryRepository = PgNamedRepository<Category>;

impl<E> Clone for PgNamedRepository<E> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<E> PgNamedRepository<E> {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            pool,
            entity: PhantomData,
        }
    }
}

impl<E: NamedEntity> PgNamedRepository<E> {
    async fn insert(&self, entity: &E) -> sqlx::Result<E> {
        let sql = format!(
            "INSERT INTO {} (name, description) VALUES ($1, $2) RETURNING *",
            E::TABLE
        );
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, E>(&sql)
            .bind(entity.name())
            .bind(entity.description())
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn rewrite(&self, entity: &E) -> sqlx::Result<Option<E>> {
        let sql = format!(
            "UPDATE {} SET name = $1, description = $2 WHERE id = $3 RETURNING *",
            E::TABLE
        );
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, E>(&sql)
            .bind(entity.name())
            .bind(entity.description())
            .bind(entity.id())
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn remove(&self, id: i64) -> sqlx::Result<u64> {
        let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(&sql).bind(id).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl<E: NamedEntity> CrudRepository<E> for PgNamedRepository<E> {
    async fn save(&self, entity: &E) -> Option<E> {
        logged!(self.insert(entity).await, "saving {} '{}'", E::TABLE, entity.name())
    }

    async fn find_by_id(&self, id: i64) -> Option<E> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", E::TABLE);
        let row = sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        logged!(row, "finding {} {}", E::TABLE, id).flatten()
    }

    async fn find_all(&self) -> Vec<E> {
        let sql = format!("SELECT * FROM {} ORDER BY id", E::TABLE);
        let rows = sqlx::query_as::<_, E>(&sql).fetch_all(&self.pool).await;
        logged!(rows, "listing {}", E::TABLE).unwrap_or_default()
    }

    async fn update(&self, entity: &E) -> Option<E> {
        logged!(self.rewrite(entity).await, "updating {} {}", E::TABLE, entity.id()).flatten()
    }

    async fn delete_by_id(&self, id: i64) {
        if let Some(0) = logged!(self.remove(id).await, "deleting {} {}", E::TABLE, id) {
            tracing::debug!("No row {} in {} to delete", id, E::TABLE);
        }
    }
}

#[async_trait]
impl<E: NamedEntity> NamedRepository<E> for PgNamedRepository<E> {
    async fn find_by_name(&self, name: &str) -> Option<E> {
        let sql = format!("SELECT * FROM {} WHERE name = $1", E::TABLE);
        let row = sqlx::query_as::<_, E>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await;
        logged!(row, "finding {} named '{}'", E::TABLE, name).flatten()
    }

    async fn find_by_name_like(&self, name: &str) -> Vec<E> {
        let sql = format!("SELECT * FROM {} WHERE name ILIKE $1 ORDER BY id", E::TABLE);
        let rows = sqlx::query_as::<_, E>(&sql)
            .bind(like_pattern(name))
            .fetch_all(&self.pool)
            .await;
        logged!(rows, "searching {} by name '{}'", E::TABLE, name).unwrap_or_default()
    }

    async fn find_by_book_id(&self, book_id: i64) -> Vec<E> {
        let sql = format!(
            r#"
            SELECT e.* FROM {table} e
            JOIN {link} l ON l.{column} = e.id
            WHERE l.book_id = $1
            ORDER BY e.id
            "#,
            table = E::TABLE,
            link = E::LINK_TABLE,
            column = E::LINK_COLUMN,
        );
        let rows = sqlx::query_as::<_, E>(&sql)
            .bind(book_id)
            .fetch_all(&self.pool)
            .await;
        logged!(rows, "finding {} of book {}", E::TABLE, book_id).unwrap_or_default()
    }
}
