//! API integration tests; they expect a server on localhost:8080

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use crate::unique_suffix;

const BASE_URL: &str = "http://localhost:8080/api/v1";

async fn create(client: &Client, resource: &str, body: Value) -> Value {
    let response = client
        .post(format!("{}/{}", BASE_URL, resource))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_reaches_database() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_duplicate_genre_is_conflict() {
    let client = Client::new();
    let name = format!("Horror {}", unique_suffix());
    let genre = json!({ "name": name, "description": "Scary" });

    create(&client, "genres", genre.clone()).await;

    let response = client
        .post(format!("{}/genres", BASE_URL))
        .json(&genre)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["message"],
        format!("Genre with name {} already exists", name)
    );

    let listed: Value = client
        .get(format!("{}/genres", BASE_URL))
        .query(&[("name", name.as_str())])
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
#[ignore]
async fn test_future_foundation_date_is_rejected() {
    let client = Client::new();

    let response = client
        .post(format!("{}/publishers", BASE_URL))
        .json(&json!({
            "name": format!("Tomorrow Press {}", unique_suffix()),
            "foundation_date": "2999-01-01"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["message"],
        "Validation failed: foundation_date cannot be in the future"
    );
}

#[tokio::test]
#[ignore]
async fn test_author_crud_cycle() {
    let client = Client::new();
    let full_name = format!("Jane Austen {}", unique_suffix());

    let created = create(
        &client,
        "authors",
        json!({
            "full_name": full_name,
            "date_of_birth": "1775-12-16",
            "sex": "FEMALE",
            "nationality": "British"
        }),
    )
    .await;
    let id = created["id"].as_i64().expect("No id in response");

    let found: Value = client
        .get(format!("{}/authors", BASE_URL))
        .query(&[("full_name_like", full_name.to_lowercase())])
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(found[0]["id"], id);

    let updated: Value = client
        .put(format!("{}/authors/{}", BASE_URL, id))
        .json(&json!({
            "full_name": full_name,
            "date_of_birth": "1775-12-16",
            "sex": "FEMALE",
            "nationality": "English"
        }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(updated["nationality"], "English");

    let deleted = client
        .delete(format!("{}/authors/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = client
        .get(format!("{}/authors/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_update_of_unknown_patron_is_not_found() {
    let client = Client::new();
    let suffix = unique_suffix();

    let response = client
        .put(format!("{}/patrons/{}", BASE_URL, i64::MAX))
        .json(&json!({
            "card_id": format!("C-{}", suffix),
            "full_name": "Nobody",
            "email": format!("nobody-{}@example.org", suffix),
            "phone": suffix,
            "address": "Nowhere",
            "date_of_birth": "1990-01-01",
            "register_date": "2024-01-01"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_malformed_id_list_is_bad_request() {
    let client = Client::new();

    let response = client
        .get(format!("{}/books", BASE_URL))
        .query(&[("author_ids", "1,two")])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
