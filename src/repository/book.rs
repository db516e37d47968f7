//! Book persistence
//!
//! A book row is stored in `books`; its authors, genres and categories live
//! in the `book_authors`, `book_genres` and `book_categories` join tables.
//! Loaded books always carry those associations and their publisher.

use async_trait::async_trait;
use sqlx::{FromRow, PgConnection, Pool, Postgres};
use std::collections::HashMap;

use super::{distinct_ids, like_pattern, publisher::load_publishers, CrudRepository};
use crate::models::{Author, Book, Category, Format, Genre, Status};

#[async_trait]
pub trait BookRepository: CrudRepository<Book> {
    async fn find_by_isbn(&self, isbn: &str) -> Option<Book>;

    /// Books whose title contains `title`, ignoring case
    async fn find_by_title_like(&self, title: &str) -> Vec<Book>;

    /// Books credited to every one of the given authors
    async fn find_by_author_ids(&self, author_ids: &[i64]) -> Vec<Book>;

    /// Books tagged with every one of the given genres
    async fn find_by_genre_ids(&self, genre_ids: &[i64]) -> Vec<Book>;

    /// Books filed under every one of the given categories
    async fn find_by_category_ids(&self, category_ids: &[i64]) -> Vec<Book>;

    async fn find_by_language(&self, language: &str) -> Vec<Book>;
    async fn find_by_publisher_id(&self, publisher_id: i64) -> Vec<Book>;
    async fn find_by_status(&self, status: Status) -> Vec<Book>;
    async fn find_by_format(&self, format: Format) -> Vec<Book>;
}

#[derive(FromRow)]
struct BookAuthorRow {
    book_id: i64,
    #[sqlx(flatten)]
    author: Author,
}

#[derive(FromRow)]
struct BookGenreRow {
    book_id: i64,
    #[sqlx(flatten)]
    genre: Genre,
}

#[derive(FromRow)]
struct BookCategoryRow {
    book_id: i64,
    #[sqlx(flatten)]
    category: Category,
}

/// Fills in authors, genres, categories and publisher of `books`, one query
/// per association regardless of how many books are passed.
pub(crate) async fn load_associations(
    conn: &mut PgConnection,
    mut books: Vec<Book>,
) -> sqlx::Result<Vec<Book>> {
    if books.is_empty() {
        return Ok(books);
    }

    let ids: Vec<i64> = books.iter().map(|b| b.id).collect();

    let author_rows = sqlx::query_as::<_, BookAuthorRow>(
        r#"
        SELECT ba.book_id, a.* FROM book_authors ba
        JOIN authors a ON a.id = ba.author_id
        WHERE ba.book_id = ANY($1)
        ORDER BY a.id
        "#,
    )
    .bind(&ids[..])
    .fetch_all(&mut *conn)
    .await?;

    let genre_rows = sqlx::query_as::<_, BookGenreRow>(
        r#"
        SELECT bg.book_id, g.* FROM book_genres bg
        JOIN genres g ON g.id = bg.genre_id
        WHERE bg.book_id = ANY($1)
        ORDER BY g.id
        "#,
    )
    .bind(&ids[..])
    .fetch_all(&mut *conn)
    .await?;

    let category_rows = sqlx::query_as::<_, BookCategoryRow>(
        r#"
        SELECT bc.book_id, c.* FROM book_categories bc
        JOIN categories c ON c.id = bc.category_id
        WHERE bc.book_id = ANY($1)
        ORDER BY c.id
        "#,
    )
    .bind(&ids[..])
    .fetch_all(&mut *conn)
    .await?;

    let publisher_ids: Vec<i64> = distinct_ids(
        &books.iter().filter_map(|b| b.publisher_id).collect::<Vec<_>>(),
    );
    let publishers = load_publishers(conn, &publisher_ids).await?;

    let mut authors: HashMap<i64, Vec<Author>> = HashMap::new();
    for row in author_rows {
        authors.entry(row.book_id).or_default().push(row.author);
    }
    let mut genres: HashMap<i64, Vec<Genre>> = HashMap::new();
    for row in genre_rows {
        genres.entry(row.book_id).or_default().push(row.genre);
    }
    let mut categories: HashMap<i64, Vec<Category>> = HashMap::new();
    for row in category_rows {
        categories.entry(row.book_id).or_default().push(row.category);
    }

    for book in &mut books {
        book.authors = authors.remove(&book.id).unwrap_or_default();
        book.genres = genres.remove(&book.id).unwrap_or_default();
        book.categories = categories.remove(&book.id).unwrap_or_default();
        book.publisher = book.publisher_id.and_then(|id| publishers.get(&id).cloned());
    }

    Ok(books)
}

/// Loads the books with the given ids, associations included, keyed by id
pub(crate) async fn load_books(
    conn: &mut PgConnection,
    ids: &[i64],
) -> sqlx::Result<HashMap<i64, Book>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;
    let books = load_associations(conn, rows).await?;

    Ok(books.into_iter().map(|b| (b.id, b)).collect())
}

/// Writes the join rows of `book` under `book_id`
async fn insert_links(conn: &mut PgConnection, book_id: i64, book: &Book) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO book_authors (book_id, author_id) SELECT $1, UNNEST($2::bigint[]) ON CONFLICT DO NOTHING",
    )
    .bind(book_id)
    .bind(book.author_ids())
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        "INSERT INTO book_genres (book_id, genre_id) SELECT $1, UNNEST($2::bigint[]) ON CONFLICT DO NOTHING",
    )
    .bind(book_id)
    .bind(book.genre_ids())
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        "INSERT INTO book_categories (book_id, category_id) SELECT $1, UNNEST($2::bigint[]) ON CONFLICT DO NOTHING",
    )
    .bind(book_id)
    .bind(book.category_ids())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn delete_links(conn: &mut PgConnection, book_id: i64) -> sqlx::Result<()> {
    for table in ["book_authors", "book_genres", "book_categories"] {
        sqlx::query(&format!("DELETE FROM {} WHERE book_id = $1", table))
            .bind(book_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Publisher id to store for `book`: the loaded publisher wins over the raw id
fn publisher_id_of(book: &Book) -> Option<i64> {
    book.publisher.as_ref().map(|p| p.id).or(book.publisher_id)
}

#[derive(Clone)]
pub struct PgBookRepository {
    pool: Pool<Postgres>,
}

impl PgBookRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn insert(&self, book: &Book) -> sqlx::Result<Book> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, isbn, language, number_of_pages, publisher_id, status, format, receipt_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.isbn)
        .bind(&book.language)
        .bind(book.number_of_pages)
        .bind(publisher_id_of(book))
        .bind(book.status)
        .bind(book.format)
        .bind(book.receipt_date)
        .fetch_one(&mut *tx)
        .await?;

        insert_links(&mut tx, row.id, book).await?;
        let saved = load_associations(&mut tx, vec![row]).await?;

        tx.commit().await?;
        saved.into_iter().next().ok_or(sqlx::Error::RowNotFound)
    }

    async fn rewrite(&self, book: &Book) -> sqlx::Result<Option<Book>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $1, isbn = $2, language = $3, number_of_pages = $4,
                publisher_id = $5, status = $6, format = $7, receipt_date = $8
            WHERE id = $9
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.isbn)
        .bind(&book.language)
        .bind(book.number_of_pages)
        .bind(publisher_id_of(book))
        .bind(book.status)
        .bind(book.format)
        .bind(book.receipt_date)
        .bind(book.id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        delete_links(&mut tx, row.id).await?;
        insert_links(&mut tx, row.id, book).await?;
        let updated = load_associations(&mut tx, vec![row]).await?;

        tx.commit().await?;
        Ok(updated.into_iter().next())
    }

    async fn remove(&self, id: i64) -> sqlx::Result<u64> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }

    async fn with_associations(&self, rows: sqlx::Result<Vec<Book>>) -> sqlx::Result<Vec<Book>> {
        let rows = rows?;
        if rows.is_empty() {
            return Ok(rows);
        }
        let mut conn = self.pool.acquire().await?;
        load_associations(&mut conn, rows).await
    }

    async fn one_with_associations(
        &self,
        row: sqlx::Result<Option<Book>>,
    ) -> sqlx::Result<Option<Book>> {
        let books = self.with_associations(row.map(|r| r.into_iter().collect())).await?;
        Ok(books.into_iter().next())
    }

    /// Books linked through `table.column` to all of `ids`. `table` and
    /// `column` are fixed names supplied by the finders below.
    async fn find_linked_to_all(
        &self,
        table: &'static str,
        column: &'static str,
        ids: &[i64],
    ) -> sqlx::Result<Vec<Book>> {
        let ids = distinct_ids(ids);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            r#"
            SELECT b.* FROM books b
            JOIN {table} l ON l.book_id = b.id
            WHERE l.{column} = ANY($1)
            GROUP BY b.id
            HAVING COUNT(DISTINCT l.{column}) = $2
            ORDER BY b.id
            "#
        );
        let rows = sqlx::query_as::<_, Book>(&query)
            .bind(&ids[..])
            .bind(ids.len() as i64)
            .fetch_all(&self.pool)
            .await;

        self.with_associations(rows).await
    }
}

#[async_trait]
impl CrudRepository<Book> for PgBookRepository {
    async fn save(&self, book: &Book) -> Option<Book> {
        logged!(self.insert(book).await, "saving book '{}'", book.isbn)
    }

    async fn find_by_id(&self, id: i64) -> Option<Book> {
        let row = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        logged!(self.one_with_associations(row).await, "finding book {}", id).flatten()
    }

    async fn find_all(&self) -> Vec<Book> {
        let rows = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await;
        logged!(self.with_associations(rows).await, "listing books").unwrap_or_default()
    }

    async fn update(&self, book: &Book) -> Option<Book> {
        logged!(self.rewrite(book).await, "updating book {}", book.id).flatten()
    }

    async fn delete_by_id(&self, id: i64) {
        if let Some(0) = logged!(self.remove(id).await, "deleting book {}", id) {
            tracing::debug!("No book {} to delete", id);
        }
    }
}

#[async_trait]
impl BookRepository for PgBookRepository {
    async fn find_by_isbn(&self, isbn: &str) -> Option<Book> {
        let row = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE isbn = $1")
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await;
        logged!(self.one_with_associations(row).await, "finding book by isbn '{}'", isbn).flatten()
    }

    async fn find_by_title_like(&self, title: &str) -> Vec<Book> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE title ILIKE $1 ORDER BY id",
        )
        .bind(like_pattern(title))
        .fetch_all(&self.pool)
        .await;
        logged!(self.with_associations(rows).await, "searching books by title '{}'", title)
            .unwrap_or_default()
    }

    async fn find_by_author_ids(&self, author_ids: &[i64]) -> Vec<Book> {
        let rows = self.find_linked_to_all("book_authors", "author_id", author_ids).await;
        logged!(rows, "finding books by authors {:?}", author_ids).unwrap_or_default()
    }

    async fn find_by_genre_ids(&self, genre_ids: &[i64]) -> Vec<Book> {
        let rows = self.find_linked_to_all("book_genres", "genre_id", genre_ids).await;
        logged!(rows, "finding books by genres {:?}", genre_ids).unwrap_or_default()
    }

    async fn find_by_category_ids(&self, category_ids: &[i64]) -> Vec<Book> {
        let rows = self
            .find_linked_to_all("book_categories", "category_id", category_ids)
            .await;
        logged!(rows, "finding books by categories {:?}", category_ids).unwrap_or_default()
    }

    async fn find_by_language(&self, language: &str) -> Vec<Book> {
        let rows = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE language = $1 ORDER BY id")
            .bind(language)
            .fetch_all(&self.pool)
            .await;
        logged!(self.with_associations(rows).await, "finding books in '{}'", language)
            .unwrap_or_default()
    }

    async fn find_by_publisher_id(&self, publisher_id: i64) -> Vec<Book> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE publisher_id = $1 ORDER BY id",
        )
        .bind(publisher_id)
        .fetch_all(&self.pool)
        .await;
        logged!(self.with_associations(rows).await, "finding books of publisher {}", publisher_id)
            .unwrap_or_default()
    }

    async fn find_by_status(&self, status: Status) -> Vec<Book> {
        let rows = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE status = $1 ORDER BY id")
            .bind(status)
            .fetch_all(&self.pool)
            .await;
        logged!(self.with_associations(rows).await, "finding books with status {}", status)
            .unwrap_or_default()
    }

    async fn find_by_format(&self, format: Format) -> Vec<Book> {
        let rows = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE format = $1 ORDER BY id")
            .bind(format)
            .fetch_all(&self.pool)
            .await;
        logged!(self.with_associations(rows).await, "finding books with format {}", format)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Publisher;
    use chrono::NaiveDate;

    fn bare_book() -> Book {
        Book {
            id: 0,
            title: "Emma".to_string(),
            isbn: "978-0141439587".to_string(),
            language: "English".to_string(),
            number_of_pages: 474,
            publisher_id: Some(7),
            status: Status::Available,
            format: Format::Paperback,
            receipt_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            authors: Vec::new(),
            genres: Vec::new(),
            categories: Vec::new(),
            publisher: None,
        }
    }

    #[test]
    fn test_publisher_id_falls_back_to_raw_id() {
        assert_eq!(publisher_id_of(&bare_book()), Some(7));
    }

    #[test]
    fn test_loaded_publisher_wins() {
        let mut book = bare_book();
        book.publisher = Some(Publisher {
            id: 9,
            name: "Penguin".to_string(),
            foundation_date: NaiveDate::from_ymd_opt(1935, 7, 30).unwrap(),
            address: None,
            email: None,
            website: None,
        });
        assert_eq!(publisher_id_of(&book), Some(9));
    }
}
