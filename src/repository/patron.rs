//! Patron persistence
//!
//! The copies recorded against a patron live in `patron_book_instances`; a
//! copy appears there for at most one patron.

use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};
use std::collections::HashMap;

use super::{distinct_ids, like_pattern, CrudRepository};
use crate::models::Patron;

#[async_trait]
pub trait PatronRepository: CrudRepository<Patron> {
    async fn find_by_card_id(&self, card_id: &str) -> Option<Patron>;

    /// Patron the given copy is recorded against
    async fn find_by_book_instance_id(&self, book_instance_id: i64) -> Option<Patron>;

    /// Patrons whose full name contains `full_name`, ignoring case
    async fn find_by_full_name_like(&self, full_name: &str) -> Vec<Patron>;

    async fn find_by_email(&self, email: &str) -> Option<Patron>;
    async fn find_by_phone(&self, phone: &str) -> Option<Patron>;
    async fn find_by_address(&self, address: &str) -> Option<Patron>;
}

async fn load_book_instance_ids(
    conn: &mut PgConnection,
    mut patrons: Vec<Patron>,
) -> sqlx::Result<Vec<Patron>> {
    if patrons.is_empty() {
        return Ok(patrons);
    }

    let ids: Vec<i64> = patrons.iter().map(|p| p.id).collect();
    let links = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT patron_id, book_instance_id FROM patron_book_instances
        WHERE patron_id = ANY($1)
        ORDER BY book_instance_id
        "#,
    )
    .bind(&ids[..])
    .fetch_all(&mut *conn)
    .await?;

    let mut by_patron: HashMap<i64, Vec<i64>> = HashMap::new();
    for (patron_id, book_instance_id) in links {
        by_patron.entry(patron_id).or_default().push(book_instance_id);
    }

    for patron in &mut patrons {
        patron.book_instance_ids = by_patron.remove(&patron.id).unwrap_or_default();
    }

    Ok(patrons)
}

async fn replace_book_instance_ids(
    conn: &mut PgConnection,
    patron_id: i64,
    book_instance_ids: &[i64],
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM patron_book_instances WHERE patron_id = $1")
        .bind(patron_id)
        .execute(&mut *conn)
        .await?;

    let ids = distinct_ids(book_instance_ids);
    if !ids.is_empty() {
        sqlx::query(
            "INSERT INTO patron_book_instances (patron_id, book_instance_id) SELECT $1, UNNEST($2::bigint[])",
        )
        .bind(patron_id)
        .bind(&ids[..])
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

#[derive(Clone)]
pub struct PgPatronRepository {
    pool: Pool<Postgres>,
}

impl PgPatronRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn insert(&self, patron: &Patron) -> sqlx::Result<Patron> {
        let mut tx = self.pool.begin().await?;

        let mut row = sqlx::query_as::<_, Patron>(
            r#"
            INSERT INTO patrons (card_id, full_name, email, phone, address, date_of_birth, register_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&patron.card_id)
        .bind(&patron.full_name)
        .bind(&patron.email)
        .bind(&patron.phone)
        .bind(&patron.address)
        .bind(patron.date_of_birth)
        .bind(patron.register_date)
        .fetch_one(&mut *tx)
        .await?;

        replace_book_instance_ids(&mut tx, row.id, &patron.book_instance_ids).await?;
        row.book_instance_ids = distinct_ids(&patron.book_instance_ids);

        tx.commit().await?;
        Ok(row)
    }

    async fn rewrite(&self, patron: &Patron) -> sqlx::Result<Option<Patron>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, Patron>(
            r#"
            UPDATE patrons
            SET card_id = $1, full_name = $2, email = $3, phone = $4, address = $5,
                date_of_birth = $6, register_date = $7
            WHERE id = $8
            RETURNING *
            "#,
        )
        .bind(&patron.card_id)
        .bind(&patron.full_name)
        .bind(&patron.email)
        .bind(&patron.phone)
        .bind(&patron.address)
        .bind(patron.date_of_birth)
        .bind(patron.register_date)
        .bind(patron.id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut row) = row else {
            return Ok(None);
        };

        replace_book_instance_ids(&mut tx, row.id, &patron.book_instance_ids).await?;
        row.book_instance_ids = distinct_ids(&patron.book_instance_ids);

        tx.commit().await?;
        Ok(Some(row))
    }

    async fn remove(&self, id: i64) -> sqlx::Result<u64> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM patrons WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }

    async fn with_book_instance_ids(
        &self,
        rows: sqlx::Result<Vec<Patron>>,
    ) -> sqlx::Result<Vec<Patron>> {
        let rows = rows?;
        if rows.is_empty() {
            return Ok(rows);
        }
        let mut conn = self.pool.acquire().await?;
        load_book_instance_ids(&mut conn, rows).await
    }

    /// Single patron matching `column = value`; `column` is one of the fixed
    /// names passed by the finders below.
    async fn find_one_by(&self, column: &'static str, value: &str) -> Option<Patron> {
        let query = format!("SELECT * FROM patrons WHERE {} = $1", column);
        let row = sqlx::query_as::<_, Patron>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await;
        let rows = self.with_book_instance_ids(row.map(|r| r.into_iter().collect())).await;
        logged!(rows, "finding patron by {} '{}'", column, value).and_then(|r| r.into_iter().next())
    }
}

#[async_trait]
impl CrudRepository<Patron> for PgPatronRepository {
    async fn save(&self, patron: &Patron) -> Option<Patron> {
        logged!(self.insert(patron).await, "saving patron '{}'", patron.card_id)
    }

    async fn find_by_id(&self, id: i64) -> Option<Patron> {
        let row = sqlx::query_as::<_, Patron>("SELECT * FROM patrons WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        let rows = self.with_book_instance_ids(row.map(|r| r.into_iter().collect())).await;
        logged!(rows, "finding patron {}", id).and_then(|r| r.into_iter().next())
    }

    async fn find_all(&self) -> Vec<Patron> {
        let rows = sqlx::query_as::<_, Patron>("SELECT * FROM patrons ORDER BY id")
            .fetch_all(&self.pool)
            .await;
        logged!(self.with_book_instance_ids(rows).await, "listing patrons").unwrap_or_default()
    }

    async fn update(&self, patron: &Patron) -> Option<Patron> {
        logged!(self.rewrite(patron).await, "updating patron {}", patron.id).flatten()
    }

    async fn delete_by_id(&self, id: i64) {
        if let Some(0) = logged!(self.remove(id).await, "deleting patron {}", id) {
            tracing::debug!("No patron {} to delete", id);
        }
    }
}

#[async_trait]
impl PatronRepository for PgPatronRepository {
    async fn find_by_card_id(&self, card_id: &str) -> Option<Patron> {
        self.find_one_by("card_id", card_id).await
    }

    async fn find_by_book_instance_id(&self, book_instance_id: i64) -> Option<Patron> {
        let row = sqlx::query_as::<_, Patron>(
            r#"
            SELECT p.* FROM patrons p
            JOIN patron_book_instances pbi ON pbi.patron_id = p.id
            WHERE pbi.book_instance_id = $1
            "#,
        )
        .bind(book_instance_id)
        .fetch_optional(&self.pool)
        .await;
        let rows = self.with_book_instance_ids(row.map(|r| r.into_iter().collect())).await;
        logged!(rows, "finding patron holding copy {}", book_instance_id)
            .and_then(|r| r.into_iter().next())
    }

    async fn find_by_full_name_like(&self, full_name: &str) -> Vec<Patron> {
        let rows = sqlx::query_as::<_, Patron>(
            "SELECT * FROM patrons WHERE full_name ILIKE $1 ORDER BY id",
        )
        .bind(like_pattern(full_name))
        .fetch_all(&self.pool)
        .await;
        logged!(
            self.with_book_instance_ids(rows).await,
            "searching patrons by name '{}'",
            full_name
        )
        .unwrap_or_default()
    }

    async fn find_by_email(&self, email: &str) -> Option<Patron> {
        self.find_one_by("email", email).await
    }

    async fn find_by_phone(&self, phone: &str) -> Option<Patron> {
        self.find_one_by("phone", phone).await
    }

    async fn find_by_address(&self, address: &str) -> Option<Patron> {
        self.find_one_by("address", address).await
    }
}
