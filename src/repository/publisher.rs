//! Publisher persistence

use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};
use std::collections::HashMap;

use super::{like_pattern, CrudRepository};
use crate::models::Publisher;

#[async_trait]
pub trait PublisherRepository: CrudRepository<Publisher> {
    async fn find_by_name(&self, name: &str) -> Option<Publisher>;
    async fn find_by_name_like(&self, name: &str) -> Vec<Publisher>;
    async fn find_by_email(&self, email: &str) -> Option<Publisher>;
    async fn find_by_website(&self, website: &str) -> Option<Publisher>;
    async fn find_by_address(&self, address: &str) -> Option<Publisher>;

    /// Publisher of the given book, if it has one
    async fn find_by_book_id(&self, book_id: i64) -> Option<Publisher>;
}

/// Loads the publishers with the given ids, keyed by id
pub(crate) async fn load_publishers(
    conn: &mut PgConnection,
    ids: &[i64],
) -> sqlx::Result<HashMap<i64, Publisher>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, Publisher>("SELECT * FROM publishers WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows.into_iter().map(|p| (p.id, p)).collect())
}

#[derive(Clone)]
pub struct PgPublisherRepository {
    pool: Pool<Postgres>,
}

impl PgPublisherRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn insert(&self, publisher: &Publisher) -> sqlx::Result<Publisher> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, Publisher>(
            r#"
            INSERT INTO publishers (name, foundation_date, address, email, website)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&publisher.name)
        .bind(publisher.foundation_date)
        .bind(&publisher.address)
        .bind(&publisher.email)
        .bind(&publisher.website)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn rewrite(&self, publisher: &Publisher) -> sqlx::Result<Option<Publisher>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, Publisher>(
            r#"
            UPDATE publishers
            SET name = $1, foundation_date = $2, address = $3, email = $4, website = $5
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&publisher.name)
        .bind(publisher.foundation_date)
        .bind(&publisher.address)
        .bind(&publisher.email)
        .bind(&publisher.website)
        .bind(publisher.id)
        .fetch_optional(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn remove(&self, id: i64) -> sqlx::Result<u64> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM publishers WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }

    /// Single publisher matching `column = value`. `column` is always one of
    /// the fixed names passed by the finders below.
    async fn find_one_by(&self, column: &'static str, value: &str) -> Option<Publisher> {
        let query = format!("SELECT * FROM publishers WHERE {} = $1", column);
        let row = sqlx::query_as::<_, Publisher>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await;
        logged!(row, "finding publisher by {} '{}'", column, value).flatten()
    }
}

#[async_trait]
impl CrudRepository<Publisher> for PgPublisherRepository {
    async fn save(&self, publisher: &Publisher) -> Option<Publisher> {
        logged!(self.insert(publisher).await, "saving publisher '{}'", publisher.name)
    }

    async fn find_by_id(&self, id: i64) -> Option<Publisher> {
        let row = sqlx::query_as::<_, Publisher>("SELECT * FROM publishers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        logged!(row, "finding publisher {}", id).flatten()
    }

    async fn find_all(&self) -> Vec<Publisher> {
        let rows = sqlx::query_as::<_, Publisher>("SELECT * FROM publishers ORDER BY id")
            .fetch_all(&self.pool)
            .await;
        logged!(rows, "listing publishers").unwrap_or_default()
    }

    async fn update(&self, publisher: &Publisher) -> Option<Publisher> {
        logged!(self.rewrite(publisher).await, "updating publisher {}", publisher.id).flatten()
    }

    async fn delete_by_id(&self, id: i64) {
        if let Some(0) = logged!(self.remove(id).await, "deleting publisher {}", id) {
            tracing::debug!("No publisher {} to delete", id);
        }
    }
}

#[async_trait]
impl PublisherRepository for PgPublisherRepository {
    async fn find_by_name(&self, name: &str) -> Option<Publisher> {
        self.find_one_by("name", name).await
    }

    async fn find_by_name_like(&self, name: &str) -> Vec<Publisher> {
        let rows = sqlx::query_as::<_, Publisher>(
            "SELECT * FROM publishers WHERE name ILIKE $1 ORDER BY id",
        )
        .bind(like_pattern(name))
        .fetch_all(&self.pool)
        .await;
        logged!(rows, "searching publishers by name '{}'", name).unwrap_or_default()
    }

    async fn find_by_email(&self, email: &str) -> Option<Publisher> {
        self.find_one_by("email", email).await
    }

    async fn find_by_website(&self, website: &str) -> Option<Publisher> {
        self.find_one_by("website", website).await
    }

    async fn find_by_address(&self, address: &str) -> Option<Publisher> {
        self.find_one_by("address", address).await
    }

    async fn find_by_book_id(&self, book_id: i64) -> Option<Publisher> {
        let row = sqlx::query_as::<_, Publisher>(
            r#"
            SELECT p.* FROM publishers p
            JOIN books b ON b.publisher_id = p.id
            WHERE b.id = $1
            "#,
        )
        .bind(book_id)
        .fetch_optional(&self.pool)
        .await;
        logged!(row, "finding publisher of book {}", book_id).flatten()
    }
}
