//! Book instance persistence

use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};

use super::{book::load_books, distinct_ids, publisher::load_publishers, CrudRepository};
use crate::models::{BookInstance, Format, Status};

#[async_trait]
pub trait BookInstanceRepository: CrudRepository<BookInstance> {
    /// Copies of the given book
    async fn find_by_book_id(&self, book_id: i64) -> Vec<BookInstance>;
    async fn find_by_publisher_id(&self, publisher_id: i64) -> Vec<BookInstance>;
    async fn find_by_status(&self, status: Status) -> Vec<BookInstance>;
    async fn find_by_format(&self, format: Format) -> Vec<BookInstance>;
}

/// Attaches the owning book (with its own associations) and the publisher
async fn load_relations(
    conn: &mut PgConnection,
    mut instances: Vec<BookInstance>,
) -> sqlx::Result<Vec<BookInstance>> {
    if instances.is_empty() {
        return Ok(instances);
    }

    let book_ids = distinct_ids(&instances.iter().map(|i| i.book_id).collect::<Vec<_>>());
    let publisher_ids = distinct_ids(
        &instances
            .iter()
            .filter_map(|i| i.publisher_id)
            .collect::<Vec<_>>(),
    );

    let books = load_books(conn, &book_ids).await?;
    let publishers = load_publishers(conn, &publisher_ids).await?;

    for instance in &mut instances {
        instance.book = books.get(&instance.book_id).cloned();
        instance.publisher = instance
            .publisher_id
            .and_then(|id| publishers.get(&id).cloned());
    }

    Ok(instances)
}

/// Book id to store for `instance`: the loaded book wins over the raw id
fn book_id_of(instance: &BookInstance) -> i64 {
    instance.book.as_ref().map_or(instance.book_id, |b| b.id)
}

fn publisher_id_of(instance: &BookInstance) -> Option<i64> {
    instance
        .publisher
        .as_ref()
        .map(|p| p.id)
        .or(instance.publisher_id)
}

#[derive(Clone)]
pub struct PgBookInstanceRepository {
    pool: Pool<Postgres>,
}

impl PgBookInstanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn insert(&self, instance: &BookInstance) -> sqlx::Result<BookInstance> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, BookInstance>(
            r#"
            INSERT INTO book_instances (book_id, publisher_id, number_of_pages, receipt_date, status, format)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(book_id_of(instance))
        .bind(publisher_id_of(instance))
        .bind(instance.number_of_pages)
        .bind(instance.receipt_date)
        .bind(instance.status)
        .bind(instance.format)
        .fetch_one(&mut *tx)
        .await?;

        let saved = load_relations(&mut tx, vec![row]).await?;
        tx.commit().await?;
        saved.into_iter().next().ok_or(sqlx::Error::RowNotFound)
    }

    async fn rewrite(&self, instance: &BookInstance) -> sqlx::Result<Option<BookInstance>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances
            SET book_id = $1, publisher_id = $2, number_of_pages = $3,
                receipt_date = $4, status = $5, format = $6
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(book_id_of(instance))
        .bind(publisher_id_of(instance))
        .bind(instance.number_of_pages)
        .bind(instance.receipt_date)
        .bind(instance.status)
        .bind(instance.format)
        .bind(instance.id)
        .fetch_optional(&mut *tx)
        .await?;

        let updated = load_relations(&mut tx, row.into_iter().collect()).await?;
        tx.commit().await?;
        Ok(updated.into_iter().next())
    }

    async fn remove(&self, id: i64) -> sqlx::Result<u64> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }

    async fn with_relations(
        &self,
        rows: sqlx::Result<Vec<BookInstance>>,
    ) -> sqlx::Result<Vec<BookInstance>> {
        let rows = rows?;
        if rows.is_empty() {
            return Ok(rows);
        }
        let mut conn = self.pool.acquire().await?;
        load_relations(&mut conn, rows).await
    }
}

#[async_trait]
impl CrudRepository<BookInstance> for PgBookInstanceRepository {
    async fn save(&self, instance: &BookInstance) -> Option<BookInstance> {
        logged!(
            self.insert(instance).await,
            "saving a copy of book {}",
            book_id_of(instance)
        )
    }

    async fn find_by_id(&self, id: i64) -> Option<BookInstance> {
        let row = sqlx::query_as::<_, BookInstance>("SELECT * FROM book_instances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        let rows = self.with_relations(row.map(|r| r.into_iter().collect())).await;
        logged!(rows, "finding book instance {}", id).and_then(|r| r.into_iter().next())
    }

    async fn find_all(&self) -> Vec<BookInstance> {
        let rows = sqlx::query_as::<_, BookInstance>("SELECT * FROM book_instances ORDER BY id")
            .fetch_all(&self.pool)
            .await;
        logged!(self.with_relations(rows).await, "listing book instances").unwrap_or_default()
    }

    async fn update(&self, instance: &BookInstance) -> Option<BookInstance> {
        logged!(self.rewrite(instance).await, "updating book instance {}", instance.id).flatten()
    }

    async fn delete_by_id(&self, id: i64) {
        if let Some(0) = logged!(self.remove(id).await, "deleting book instance {}", id) {
            tracing::debug!("No book instance {} to delete", id);
        }
    }
}

#[async_trait]
impl BookInstanceRepository for PgBookInstanceRepository {
    async fn find_by_book_id(&self, book_id: i64) -> Vec<BookInstance> {
        let rows = sqlx::query_as::<_, BookInstance>(
            "SELECT * FROM book_instances WHERE book_id = $1 ORDER BY id",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await;
        logged!(self.with_relations(rows).await, "finding copies of book {}", book_id)
            .unwrap_or_default()
    }

    async fn find_by_publisher_id(&self, publisher_id: i64) -> Vec<BookInstance> {
        let rows = sqlx::query_as::<_, BookInstance>(
            "SELECT * FROM book_instances WHERE publisher_id = $1 ORDER BY id",
        )
        .bind(publisher_id)
        .fetch_all(&self.pool)
        .await;
        logged!(
            self.with_relations(rows).await,
            "finding copies from publisher {}",
            publisher_id
        )
        .unwrap_or_default()
    }

    async fn find_by_status(&self, status: Status) -> Vec<BookInstance> {
        let rows = sqlx::query_as::<_, BookInstance>(
            "SELECT * FROM book_instances WHERE status = $1 ORDER BY id",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await;
        logged!(self.with_relations(rows).await, "finding copies with status {}", status)
            .unwrap_or_default()
    }

    async fn find_by_format(&self, format: Format) -> Vec<BookInstance> {
        let rows = sqlx::query_as::<_, BookInstance>(
            "SELECT * FROM book_instances WHERE format = $1 ORDER BY id",
        )
        .bind(format)
        .fetch_all(&self.pool)
        .await;
        logged!(self.with_relations(rows).await, "finding copies with format {}", format)
            .unwrap_or_default()
    }
}
