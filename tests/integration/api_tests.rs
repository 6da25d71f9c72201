//! API integration tests
//!
//! These run against a live server with a migrated database.

use bookcase_server::models::UserClaims;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Mint a bearer token signed with the server secret
fn auth_token() -> String {
    let secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "change-this-secret-in-production".to_string());
    UserClaims::new("integration-tests", chrono::Duration::hours(1))
        .create_token(&secret)
        .expect("Failed to sign token")
}

/// Tag making names unique across runs against the same database
fn run_tag() -> String {
    format!("T{}", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

async fn create_author(client: &Client, first_name: &str, last_name: &str) -> Value {
    let response = client
        .post(format!("{}/authors", BASE_URL))
        .bearer_auth(auth_token())
        .json(&json!({ "first_name": first_name, "last_name": last_name }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"].clone()
}

async fn create_book(client: &Client, author_id: i64, title: &str, price: &str) -> Value {
    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(auth_token())
        .json(&json!({
            "title": title,
            "price": price,
            "publication_date": "2001-05-04",
            "author_id": author_id
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["data"].clone()
}

async fn get_json(client: &Client, path: &str) -> (StatusCode, Value) {
    let response = client
        .get(format!("{}{}", BASE_URL, path))
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    let body: Value = response.json().await.expect("Failed to parse response");
    (status, body)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let (status, body) = get_json(&client, "/health").await;
    assert!(status.is_success());
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let (status, body) = get_json(&client, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_me_returns_token_subject() {
    let client = Client::new();

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(auth_token())
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["sub"], "integration-tests");
}

#[tokio::test]
#[ignore]
async fn test_write_requires_token() {
    let client = Client::new();

    let response = client
        .post(format!("{}/authors", BASE_URL))
        .json(&json!({ "first_name": "No", "last_name": "Token" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "UNAUTHENTICATED");
}

#[tokio::test]
#[ignore]
async fn test_write_rejects_bad_token() {
    let client = Client::new();

    let response = client
        .delete(format!("{}/books/1", BASE_URL))
        .bearer_auth("not-a-token")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_authors_sorted_by_last_name_desc() {
    let client = Client::new();
    let tag = run_tag();

    for last_name in ["Austen", "Eco", "Borges", "Dumas", "Calvino"] {
        create_author(&client, &tag, last_name).await;
    }

    let (status, body) = get_json(
        &client,
        &format!("/authors?search={}&sort=last_name&direction=desc", tag),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|a| a["last_name"].as_str())
        .collect();
    assert_eq!(names, vec!["Eco", "Dumas", "Calvino", "Borges", "Austen"]);
    assert_eq!(body["meta"]["total"], 5);
    assert_eq!(body["meta"]["per_page"], 15);
    assert_eq!(body["meta"]["last_page"], 1);
    assert!(body["links"]["next"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_author_pagination_links() {
    let client = Client::new();
    let tag = run_tag();

    for last_name in ["One", "Two", "Three"] {
        create_author(&client, &tag, last_name).await;
    }

    let (_, body) = get_json(&client, &format!("/authors?search={}&per_page=2&page=2", tag)).await;

    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["meta"]["current_page"], 2);
    assert_eq!(body["meta"]["last_page"], 2);
    assert_eq!(body["meta"]["from"], 3);
    assert_eq!(body["meta"]["to"], 3);
    assert!(body["links"]["next"].is_null());
    let prev = body["links"]["prev"].as_str().expect("prev link");
    assert!(prev.ends_with("page=1"));
    assert!(prev.contains(&format!("search={}", tag)));
}

#[tokio::test]
#[ignore]
async fn test_delete_author_with_books_is_refused() {
    let client = Client::new();
    let tag = run_tag();

    let author = create_author(&client, &tag, "Prolific").await;
    let author_id = author["id"].as_i64().expect("author id");
    for title in ["First", "Second", "Third"] {
        create_book(&client, author_id, &format!("{} {}", title, tag), "10.00").await;
    }

    let (_, listed) = get_json(&client, &format!("/authors?search={}", tag)).await;
    assert_eq!(listed["data"][0]["books_count"], 3);

    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .bearer_auth(auth_token())
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "AUTHOR_HAS_BOOKS");

    let (status, _) = get_json(&client, &format!("/authors/{}", author_id)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore]
async fn test_delete_author_without_books() {
    let client = Client::new();
    let tag = run_tag();

    let author = create_author(&client, &tag, "Idle").await;
    let author_id = author["id"].as_i64().expect("author id");

    let response = client
        .delete(format!("{}/authors/{}", BASE_URL, author_id))
        .bearer_auth(auth_token())
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let (status, body) = get_json(&client, &format!("/authors/{}", author_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
#[ignore]
async fn test_books_price_range_is_inclusive() {
    let client = Client::new();
    let tag = run_tag();

    let author = create_author(&client, &tag, "Pricer").await;
    let author_id = author["id"].as_i64().expect("author id");
    create_book(&client, author_id, "Cheap", "15.99").await;
    create_book(&client, author_id, "Middle", "25.99").await;
    create_book(&client, author_id, "Dear", "35.99").await;

    let (status, body) = get_json(
        &client,
        &format!("/books?author_id={}&min_price=20&max_price=30", author_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let data = body["data"].as_array().expect("data array");
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["price"], "25.99");
    assert_eq!(data[0]["author"]["id"], author_id);

    let (_, bounded) = get_json(
        &client,
        &format!("/books?author_id={}&min_price=25.99&max_price=35.99", author_id),
    )
    .await;
    assert_eq!(bounded["meta"]["total"], 2);
}

#[tokio::test]
#[ignore]
async fn test_books_search_matches_author_name() {
    let client = Client::new();
    let tag = run_tag();

    let author = create_author(&client, "Searchable", &tag).await;
    let author_id = author["id"].as_i64().expect("author id");
    create_book(&client, author_id, "Untitled", "9.99").await;

    let (_, body) = get_json(&client, &format!("/books?search={}", tag.to_lowercase())).await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["title"], "Untitled");
}

#[tokio::test]
#[ignore]
async fn test_books_sorted_by_author_name_desc() {
    let client = Client::new();
    let tag = run_tag();
    let shared = format!("Zz{}", tag);
    let other = format!("Aa{}", tag);

    let anna = create_author(&client, "Anna", &shared).await;
    let boris = create_author(&client, "Boris", &shared).await;
    let carl = create_author(&client, "Carl", &other).await;
    for (author, title) in [(&anna, "Anna's"), (&boris, "Boris's"), (&carl, "Carl's")] {
        let author_id = author["id"].as_i64().expect("author id");
        create_book(&client, author_id, &format!("{} {}", title, tag), "10.00").await;
    }

    let (status, body) = get_json(
        &client,
        &format!("/books?search={}&sort=author_name&direction=desc", tag),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 3);

    let authors: Vec<(&str, &str)> = body["data"]
        .as_array()
        .expect("data array")
        .iter()
        .filter_map(|b| Some((b["author"]["last_name"].as_str()?, b["author"]["first_name"].as_str()?)))
        .collect();
    assert_eq!(
        authors,
        vec![
            (shared.as_str(), "Boris"),
            (shared.as_str(), "Anna"),
            (other.as_str(), "Carl"),
        ]
    );
}

#[tokio::test]
#[ignore]
async fn test_invalid_filters_are_ignored() {
    let client = Client::new();

    let (status, body) = get_json(&client, "/books?author_id=abc&min_price=cheap&sort=bogus&per_page=-3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["per_page"], 15);
}

#[tokio::test]
#[ignore]
async fn test_author_books_listing() {
    let client = Client::new();
    let tag = run_tag();

    let author = create_author(&client, &tag, "Shelf").await;
    let author_id = author["id"].as_i64().expect("author id");
    create_book(&client, author_id, "Beta", "12.00").await;
    create_book(&client, author_id, "Alpha", "11.00").await;

    let (status, body) = get_json(&client, &format!("/authors/{}/books?per_page=1", author_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["data"][0]["title"], "Alpha");

    let (missing, _) = get_json(&client, "/authors/0/books").await;
    assert_eq!(missing, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_create_book_validation() {
    let client = Client::new();

    let response = client
        .post(format!("{}/books", BASE_URL))
        .bearer_auth(auth_token())
        .json(&json!({ "title": "", "price": "-1", "publication_date": "2001-01-01", "author_id": 0 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "VALIDATION_FAILED");
    assert!(body["errors"]["title"].is_array());
    assert!(body["errors"]["price"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_update_book_keeps_absent_fields() {
    let client = Client::new();
    let tag = run_tag();

    let author = create_author(&client, &tag, "Editor").await;
    let author_id = author["id"].as_i64().expect("author id");
    let book = create_book(&client, author_id, "Draft", "19.50").await;
    let book_id = book["id"].as_i64().expect("book id");

    let response = client
        .put(format!("{}/books/{}", BASE_URL, book_id))
        .bearer_auth(auth_token())
        .json(&json!({ "title": "Final" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["title"], "Final");
    assert_eq!(body["data"]["price"], "19.50");
}
