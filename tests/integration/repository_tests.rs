//! Repository tests against a live database
//!
//! Uses `DATABASE_URL`, falling back to the configured defaults.

use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;

use shelfmark::{
    config::AppConfig,
    models::{Author, Book, BookInstance, Category, Format, Genre, Patron, Publisher, Sex, Status},
    repository::{
        AuthorRepository, BookRepository, CrudRepository, NamedRepository, PatronRepository,
        Repository,
    },
};

use crate::unique_suffix;

async fn repository() -> Repository {
    dotenvy::dotenv().ok();
    let config = AppConfig::load().expect("Failed to load configuration");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database.connection_url())
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    Repository::new(pool)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn genre(name: &str) -> Genre {
    Genre {
        id: 0,
        name: name.to_string(),
        description: "Test genre".to_string(),
    }
}

fn author(full_name: &str, sex: Sex) -> Author {
    Author {
        id: 0,
        full_name: full_name.to_string(),
        date_of_birth: date(1775, 12, 16),
        sex,
        nationality: "British".to_string(),
    }
}

struct Shelf {
    authors: Vec<Author>,
    genre: Genre,
    category: Category,
    publisher: Publisher,
}

async fn shelf(repo: &Repository, suffix: &str) -> Shelf {
    let first = repo
        .authors
        .save(&author(&format!("Jane Austen {}", suffix), Sex::Female))
        .await
        .unwrap();
    let second = repo
        .authors
        .save(&author(&format!("Anne Brontë {}", suffix), Sex::Female))
        .await
        .unwrap();
    let genre = repo
        .genres
        .save(&genre(&format!("Romance {}", suffix)))
        .await
        .unwrap();
    let category = repo
        .categories
        .save(&Category {
            id: 0,
            name: format!("Classics {}", suffix),
            description: "Enduring literature".to_string(),
        })
        .await
        .unwrap();
    let publisher = repo
        .publishers
        .save(&Publisher {
            id: 0,
            name: format!("Penguin {}", suffix),
            foundation_date: date(1935, 7, 30),
            address: None,
            email: None,
            website: None,
        })
        .await
        .unwrap();

    Shelf {
        authors: vec![first, second],
        genre,
        category,
        publisher,
    }
}

fn book(shelf: &Shelf, isbn: &str, authors: Vec<Author>) -> Book {
    Book {
        id: 0,
        title: "Pride and Prejudice".to_string(),
        isbn: isbn.to_string(),
        language: "English".to_string(),
        number_of_pages: 480,
        publisher_id: Some(shelf.publisher.id),
        status: Status::Available,
        format: Format::Paperback,
        receipt_date: date(2024, 1, 15),
        authors,
        genres: vec![shelf.genre.clone()],
        categories: vec![shelf.category.clone()],
        publisher: Some(shelf.publisher.clone()),
    }
}

#[tokio::test]
#[ignore]
async fn test_duplicate_genre_name_is_refused_by_schema() {
    let repo = repository().await;
    let name = format!("Horror {}", unique_suffix());

    let first = repo.genres.save(&genre(&name)).await;
    let second = repo.genres.save(&genre(&name)).await;

    assert!(first.is_some());
    assert!(second.is_none());
    let stored: Vec<_> = repo
        .genres
        .find_all()
        .await
        .into_iter()
        .filter(|g| g.name == name)
        .collect();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_author_like_search_ignores_case() {
    let repo = repository().await;
    let suffix = unique_suffix();
    let saved = repo
        .authors
        .save(&author(&format!("Jane Austen {}", suffix), Sex::Female))
        .await
        .unwrap();

    let found = repo
        .authors
        .find_by_full_name_like(&format!("AUSTEN {}", suffix))
        .await;
    assert_eq!(found, vec![saved.clone()]);

    let by_sex = repo.authors.find_by_sex(Sex::Female).await;
    assert!(by_sex.contains(&saved));
}

#[tokio::test]
#[ignore]
async fn test_like_search_treats_wildcards_literally() {
    let repo = repository().await;
    let suffix = unique_suffix();
    repo.genres
        .save(&genre(&format!("Cozy {}", suffix)))
        .await
        .unwrap();

    assert!(repo
        .genres
        .find_by_name_like(&format!("%{}", suffix))
        .await
        .is_empty());
}

#[tokio::test]
#[ignore]
async fn test_book_round_trip_keeps_associations() {
    let repo = repository().await;
    let suffix = unique_suffix();
    let shelf = shelf(&repo, &suffix).await;

    let saved = repo
        .books
        .save(&book(&shelf, &format!("isbn-{}", suffix), shelf.authors.clone()))
        .await
        .unwrap();
    let loaded = repo.books.find_by_id(saved.id).await.unwrap();

    assert_eq!(loaded, saved);
    assert_eq!(loaded.author_ids(), vec![shelf.authors[0].id, shelf.authors[1].id]);
    assert_eq!(loaded.publisher, Some(shelf.publisher.clone()));
    assert_eq!(
        repo.books.find_by_isbn(&saved.isbn).await.map(|b| b.id),
        Some(saved.id)
    );
}

#[tokio::test]
#[ignore]
async fn test_author_ids_match_books_with_all_of_them() {
    let repo = repository().await;
    let suffix = unique_suffix();
    let shelf = shelf(&repo, &suffix).await;
    let (austen, bronte) = (shelf.authors[0].clone(), shelf.authors[1].clone());

    let solo = repo
        .books
        .save(&book(&shelf, &format!("solo-{}", suffix), vec![austen.clone()]))
        .await
        .unwrap();
    let joint = repo
        .books
        .save(&book(&shelf, &format!("joint-{}", suffix), vec![austen.clone(), bronte.clone()]))
        .await
        .unwrap();

    let both: Vec<i64> = repo
        .books
        .find_by_author_ids(&[austen.id, bronte.id, austen.id])
        .await
        .iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(both, vec![joint.id]);

    let either: Vec<i64> = repo
        .books
        .find_by_author_ids(&[austen.id])
        .await
        .iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(either, vec![solo.id, joint.id]);
}

#[tokio::test]
#[ignore]
async fn test_update_of_unknown_id_creates_nothing() {
    let repo = repository().await;
    let ghost = Genre {
        id: i64::MAX,
        ..genre(&format!("Ghost {}", unique_suffix()))
    };

    assert!(repo.genres.update(&ghost).await.is_none());
    assert!(repo.genres.find_by_name(&ghost.name).await.is_none());
}

#[tokio::test]
#[ignore]
async fn test_delete_is_idempotent() {
    let repo = repository().await;
    let saved = repo
        .genres
        .save(&genre(&format!("Fleeting {}", unique_suffix())))
        .await
        .unwrap();

    repo.genres.delete_by_id(saved.id).await;
    repo.genres.delete_by_id(saved.id).await;

    assert!(repo.genres.find_by_id(saved.id).await.is_none());
}

#[tokio::test]
#[ignore]
async fn test_patron_holds_copies() {
    let repo = repository().await;
    let suffix = unique_suffix();
    let shelf = shelf(&repo, &suffix).await;
    let stored = repo
        .books
        .save(&book(&shelf, &format!("copy-{}", suffix), shelf.authors.clone()))
        .await
        .unwrap();

    let copy = repo
        .book_instances
        .save(&BookInstance {
            id: 0,
            book_id: stored.id,
            publisher_id: Some(shelf.publisher.id),
            number_of_pages: 482,
            receipt_date: date(2024, 2, 1),
            status: Status::CheckedOut,
            format: Format::Hardcover,
            book: None,
            publisher: None,
        })
        .await
        .unwrap();
    assert_eq!(copy.book.as_ref().map(|b| b.id), Some(stored.id));

    let patron = repo
        .patrons
        .save(&Patron {
            id: 0,
            card_id: format!("C-{}", suffix),
            full_name: "Elizabeth Bennet".to_string(),
            email: format!("lizzy-{}@longbourn.example", suffix),
            phone: format!("+44-{}", suffix),
            address: format!("Longbourn {}", suffix),
            date_of_birth: date(1992, 4, 2),
            register_date: date(2024, 2, 1),
            book_instance_ids: vec![copy.id],
        })
        .await
        .unwrap();

    let holder = repo.patrons.find_by_book_instance_id(copy.id).await.unwrap();
    assert_eq!(holder.id, patron.id);
    assert_eq!(holder.book_instance_ids, vec![copy.id]);

    let returned = repo
        .patrons
        .update(&Patron {
            book_instance_ids: Vec::new(),
            ..patron.clone()
        })
        .await
        .unwrap();
    assert!(returned.book_instance_ids.is_empty());
    assert!(repo.patrons.find_by_book_instance_id(copy.id).await.is_none());
}
