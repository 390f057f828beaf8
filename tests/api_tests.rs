//! API integration tests
//!
//! These run against a live dev server with the bootstrap admin configured:
//!
//! ```toml
//! [bootstrap]
//! admin_username = "admin"
//! admin_email = "admin@lectern.local"
//! admin_password = "admin"
//! ```
//!
//! Run with: cargo test -- --ignored

use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8000";

/// Unique suffix so tests can re-run against the same database
fn unique() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos()
}

async fn admin_token(client: &Client) -> String {
    login(client, "admin@lectern.local", "admin").await
}

async fn login(client: &Client, email: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    assert!(response.status().is_success(), "login failed for {}", email);

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["access_token"]
        .as_str()
        .expect("No token in response")
        .to_string()
}

/// Register a fresh reader account and return its bearer token
async fn register_reader(client: &Client, tag: &str) -> String {
    let email = format!("{}-{}@example.com", tag, unique());

    let response = client
        .post(format!("{}/register", BASE_URL))
        .json(&json!({
            "username": tag,
            "email": email,
            "password": "password"
        }))
        .send()
        .await
        .expect("Failed to send register request");

    assert_eq!(response.status(), 201);

    login(client, &email, "password").await
}

async fn create_author(client: &Client, token: &str, name: &str) -> i64 {
    let response = client
        .post(format!("{}/author/create", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "name": name,
            "bio": "Test author",
            "bday": "1970-01-01"
        }))
        .send()
        .await
        .expect("Failed to send create author request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse author response");
    body["id"].as_i64().expect("No author ID")
}

async fn create_book(client: &Client, token: &str, authors: &[i64], copies: i64) -> i64 {
    let response = client
        .post(format!("{}/book/create", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": format!("Test Book {}", unique()),
            "description": "A book for testing",
            "publication": "2001-06-15",
            "authors": authors,
            "style": "novel",
            "copies": copies
        }))
        .send()
        .await
        .expect("Failed to send create book request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse book response");
    body["id"].as_i64().expect("No book ID")
}

async fn take_book(client: &Client, token: &str, book_id: i64) -> reqwest::Response {
    client
        .post(format!("{}/book/take/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send take request")
}

async fn return_book(client: &Client, token: &str, book_id: i64) -> reqwest::Response {
    client
        .delete(format!("{}/book/return/{}", BASE_URL, book_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send return request")
}

async fn book_copies(client: &Client, book_id: i64) -> i64 {
    let response = client
        .get(format!("{}/book/get/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send get book request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse book response");
    body["copies"].as_i64().expect("No copies field")
}

#[tokio::test]
#[ignore]
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
async fn test_register_and_login() {
    let client = Client::new();
    let email = format!("reader-{}@example.com", unique());

    let response = client
        .post(format!("{}/register", BASE_URL))
        .json(&json!({
            "username": "reader",
            "email": email,
            "password": "password"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["role"], "reader");
    assert!(body["password"].is_null(), "password hash must not leak");

    let token = login(&client, &email, "password").await;
    assert!(!token.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_register_duplicate_email() {
    let client = Client::new();
    let email = format!("dup-{}@example.com", unique());

    for expected in [201, 400] {
        let response = client
            .post(format!("{}/register", BASE_URL))
            .json(&json!({
                "username": "dup",
                "email": email,
                "password": "password"
            }))
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), expected);
    }
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/login", BASE_URL))
        .json(&json!({ "email": "admin@lectern.local", "password": "wrong" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_reader_cannot_use_admin_endpoints() {
    let client = Client::new();
    let token = register_reader(&client, "nonadmin").await;

    let response = client
        .post(format!("{}/author/create", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "name": "Denied" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 403);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["detail"], "You don't have admin access");
}

#[tokio::test]
#[ignore]
async fn test_take_requires_authentication() {
    let client = Client::new();

    let response = client
        .post(format!("{}/book/take/1", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_create_book_with_unknown_author_fails() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let response = client
        .post(format!("{}/book/create", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({
            "title": "Ghost-written",
            "description": "No such author",
            "publication": "2001-06-15",
            "authors": [999999999],
            "style": "novel",
            "copies": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["detail"], "Some authors were not found.");
}

#[tokio::test]
#[ignore]
async fn test_create_book_with_valid_authors() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let first = create_author(&client, &admin, "First Author").await;
    let second = create_author(&client, &admin, "Second Author").await;

    let response = client
        .post(format!("{}/book/create", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({
            "title": "Co-authored",
            "description": "Two authors",
            "publication": "2001-06-15",
            "authors": [first, second],
            "style": "novel",
            "copies": 3
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let mut ids: Vec<i64> = body["authors"]
        .as_array()
        .expect("authors must be an array")
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    ids.sort();
    assert_eq!(ids, vec![first.min(second), first.max(second)]);
}

#[tokio::test]
#[ignore]
async fn test_take_and_return_restores_copies() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let reader = register_reader(&client, "roundtrip").await;

    let author = create_author(&client, &admin, "Roundtrip Author").await;
    let book = create_book(&client, &admin, &[author], 2).await;

    let response = take_book(&client, &reader, book).await;
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse loan response");
    assert_eq!(body["book_id"].as_i64(), Some(book));
    assert_eq!(body["book"]["copies"].as_i64(), Some(1));
    assert!(body["user"]["username"].is_string());

    assert_eq!(book_copies(&client, book).await, 1);

    let response = return_book(&client, &reader, book).await;
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse return response");
    assert_eq!(body["detail"], "Returned book");
    assert_eq!(body["book_id"].as_i64(), Some(book));

    assert_eq!(book_copies(&client, book).await, 2);
}

#[tokio::test]
#[ignore]
async fn test_take_nonexistent_book() {
    let client = Client::new();
    let reader = register_reader(&client, "nobook").await;

    let response = take_book(&client, &reader, 999999999).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_copy_exhaustion_and_recovery() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let reader_a = register_reader(&client, "exhaust-a").await;
    let reader_b = register_reader(&client, "exhaust-b").await;

    let author = create_author(&client, &admin, "Scarce Author").await;
    let book = create_book(&client, &admin, &[author], 1).await;

    // A takes the only copy
    let response = take_book(&client, &reader_a, book).await;
    assert!(response.status().is_success());
    assert_eq!(book_copies(&client, book).await, 0);

    // B is turned away
    let response = take_book(&client, &reader_b, book).await;
    assert_eq!(response.status(), 403);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["detail"], "Not enough copies of books.");

    // A returns, B succeeds
    let response = return_book(&client, &reader_a, book).await;
    assert!(response.status().is_success());
    assert_eq!(book_copies(&client, book).await, 1);

    let response = take_book(&client, &reader_b, book).await;
    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_loan_limit() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let reader = register_reader(&client, "limit").await;

    let author = create_author(&client, &admin, "Prolific Author").await;

    let mut books = Vec::new();
    for _ in 0..6 {
        books.push(create_book(&client, &admin, &[author], 1).await);
    }

    for book in &books[..5] {
        let response = take_book(&client, &reader, *book).await;
        assert!(response.status().is_success());
    }

    // The 6th take fails regardless of copy availability
    let response = take_book(&client, &reader, books[5]).await;
    assert_eq!(response.status(), 403);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["detail"], "User can't take more than 5 books.");
}

#[tokio::test]
#[ignore]
async fn test_return_of_anothers_loan_is_not_found() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let holder = register_reader(&client, "holder").await;
    let intruder = register_reader(&client, "intruder").await;

    let author = create_author(&client, &admin, "Held Author").await;
    let book = create_book(&client, &admin, &[author], 1).await;

    let response = take_book(&client, &holder, book).await;
    assert!(response.status().is_success());

    // Someone else's loan looks exactly like no loan
    let response = return_book(&client, &intruder, book).await;
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["detail"], "Not found loans by user or book");

    // And a book never borrowed gives the same answer
    let never_loaned = create_book(&client, &admin, &[author], 1).await;
    let response = return_book(&client, &intruder, never_loaned).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_takes_of_last_copy() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let reader_a = register_reader(&client, "race-a").await;
    let reader_b = register_reader(&client, "race-b").await;

    let author = create_author(&client, &admin, "Contended Author").await;
    let book = create_book(&client, &admin, &[author], 1).await;

    let (first, second) = tokio::join!(
        take_book(&client, &reader_a, book),
        take_book(&client, &reader_b, book)
    );

    let statuses = [first.status(), second.status()];
    let successes = statuses.iter().filter(|s| s.is_success()).count();
    let conflicts = statuses.iter().filter(|s| s.as_u16() == 403).count();

    assert_eq!(successes, 1, "exactly one take must win");
    assert_eq!(conflicts, 1, "the other must be turned away");
    assert_eq!(book_copies(&client, book).await, 0);
}

#[tokio::test]
#[ignore]
async fn test_delete_book_with_outstanding_loan_is_refused() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let reader = register_reader(&client, "blocker").await;

    let author = create_author(&client, &admin, "Deleted Author").await;
    let book = create_book(&client, &admin, &[author], 1).await;

    let response = take_book(&client, &reader, book).await;
    assert!(response.status().is_success());

    let response = client
        .delete(format!("{}/book/delete/{}", BASE_URL, book))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send delete request");

    assert_eq!(response.status(), 409);

    // After the return the delete goes through
    let response = return_book(&client, &reader, book).await;
    assert!(response.status().is_success());

    let response = client
        .delete(format!("{}/book/delete/{}", BASE_URL, book))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send delete request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_admin_register_new_requires_all_fields() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let response = client
        .post(format!("{}/admin/register_new", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "username": "incomplete" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(
        body["detail"],
        "The email password and username are not specified."
    );
}

#[tokio::test]
#[ignore]
async fn test_admin_can_create_admin() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let email = format!("second-admin-{}@example.com", unique());

    let response = client
        .post(format!("{}/admin/register_new", BASE_URL))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({
            "username": "second-admin",
            "email": email,
            "password": "password",
            "role": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["role"], "admin");

    // The new admin's token passes the admin gate
    let token = login(&client, &email, "password").await;
    let response = client
        .get(format!("{}/admin/users/get", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_profile_update() {
    let client = Client::new();
    let token = register_reader(&client, "profile").await;
    let new_email = format!("renamed-{}@example.com", unique());

    let response = client
        .put(format!("{}/profile/update/", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "username": "renamed", "email": new_email }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], "renamed");
    assert_eq!(body["email"], new_email.as_str());
}

#[tokio::test]
#[ignore]
async fn test_author_crud() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let id = create_author(&client, &admin, "CRUD Author").await;

    let response = client
        .get(format!("{}/author/get/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .put(format!("{}/author/update/{}", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", admin))
        .json(&json!({ "name": "Renamed Author", "bio": "Updated", "bday": "1980-02-02" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], "Renamed Author");

    let response = client
        .delete(format!("{}/author/delete/{}", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", admin))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let response = client
        .get(format!("{}/author/get/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}
