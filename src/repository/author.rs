//! Author persistence

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{like_pattern, CrudRepository};
use crate::models::{Author, Sex};

#[async_trait]
pub trait AuthorRepository: CrudRepository<Author> {
    /// Authors whose full name equals `full_name` exactly
    async fn find_by_full_name(&self, full_name: &str) -> Vec<Author>;

    /// Authors whose full name contains `full_name`, ignoring case
    async fn find_by_full_name_like(&self, full_name: &str) -> Vec<Author>;

    async fn find_by_sex(&self, sex: Sex) -> Vec<Author>;

    /// Authors credited on the given book
    async fn find_by_book_id(&self, book_id: i64) -> Vec<Author>;
}

#[derive(Clone)]
pub struct PgAuthorRepository {
    pool: Pool<Postgres>,
}

impl PgAuthorRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn insert(&self, author: &Author) -> sqlx::Result<Author> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (full_name, date_of_birth, sex, nationality)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&author.full_name)
        .bind(author.date_of_birth)
        .bind(author.sex)
        .bind(&author.nationality)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn rewrite(&self, author: &Author) -> sqlx::Result<Option<Author>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors
            SET full_name = $1, date_of_birth = $2, sex = $3, nationality = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(&author.full_name)
        .bind(author.date_of_birth)
        .bind(author.sex)
        .bind(&author.nationality)
        .bind(author.id)
        .fetch_optional(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn remove(&self, id: i64) -> sqlx::Result<u64> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl CrudRepository<Author> for PgAuthorRepository {
    async fn save(&self, author: &Author) -> Option<Author> {
        logged!(self.insert(author).await, "saving author '{}'", author.full_name)
    }

    async fn find_by_id(&self, id: i64) -> Option<Author> {
        let row = sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        logged!(row, "finding author {}", id).flatten()
    }

    async fn find_all(&self) -> Vec<Author> {
        let rows = sqlx::query_as::<_, Author>("SELECT * FROM authors ORDER BY id")
            .fetch_all(&self.pool)
            .await;
        logged!(rows, "listing authors").unwrap_or_default()
    }

    async fn update(&self, author: &Author) -> Option<Author> {
        logged!(self.rewrite(author).await, "updating author {}", author.id).flatten()
    }

    async fn delete_by_id(&self, id: i64) {
        if let Some(0) = logged!(self.remove(id).await, "deleting author {}", id) {
            tracing::debug!("No author {} to delete", id);
        }
    }
}

#[async_trait]
impl AuthorRepository for PgAuthorRepository {
    async fn find_by_full_name(&self, full_name: &str) -> Vec<Author> {
        let rows = sqlx::query_as::<_, Author>(
            "SELECT * FROM authors WHERE full_name = $1 ORDER BY id",
        )
        .bind(full_name)
        .fetch_all(&self.pool)
        .await;
        logged!(rows, "finding authors named '{}'", full_name).unwrap_or_default()
    }

    async fn find_by_full_name_like(&self, full_name: &str) -> Vec<Author> {
        let rows = sqlx::query_as::<_, Author>(
            "SELECT * FROM authors WHERE full_name ILIKE $1 ORDER BY id",
        )
        .bind(like_pattern(full_name))
        .fetch_all(&self.pool)
        .await;
        logged!(rows, "searching authors by name '{}'", full_name).unwrap_or_default()
    }

    async fn find_by_sex(&self, sex: Sex) -> Vec<Author> {
        let rows = sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE sex = $1 ORDER BY id")
            .bind(sex)
            .fetch_all(&self.pool)
            .await;
        logged!(rows, "finding authors by sex {}", sex).unwrap_or_default()
    }

    async fn find_by_book_id(&self, book_id: i64) -> Vec<Author> {
        let rows = sqlx::query_as::<_, Author>(
            r#"
            SELECT a.* FROM authors a
            JOIN book_authors ba ON ba.author_id = a.id
            WHERE ba.book_id = $1
            ORDER BY a.id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await;
        logged!(rows, "finding authors of book {}", book_id).unwrap_or_default()
    }
}
