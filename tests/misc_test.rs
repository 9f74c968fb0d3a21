//! Miscellaneous integration tests (health check, error pages, unicode).

mod common;

use axum::http::StatusCode;
use common::TestClient;

/// Test health endpoint.
#[tokio::test]
async fn test_health_endpoint() {
    let client = TestClient::new();
    let (status, body) = client.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

/// Unknown routes render the full error page.
#[tokio::test]
async fn test_not_found_page() {
    let client = TestClient::new();
    let (status, body) = client.get("/does/not/exist").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("404 Not Found"));
    assert!(body.contains("<html"));
}

/// API errors keep their short body instead of the full page.
#[tokio::test]
async fn test_api_error_is_not_a_page() {
    let client = TestClient::new();
    let (status, body) = client.get("/api/users/ghost/summary").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!body.contains("<html"));
    assert!(body.contains("alert-error"));
}

/// Unicode names and notes survive the round trip through the forms.
#[tokio::test]
async fn test_unicode_profile_and_notes() {
    let client = TestClient::new();
    assert!(client.create_profile("Zoë", "50000").await);

    let (status, body) = client.get("/users/Zo%C3%AB").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Zoë"));

    let year = chrono::Datelike::year(&chrono::Local::now()).to_string();
    let (status, _) = client
        .post_form(
            "/users/Zo%C3%AB/expenses",
            &[("month", "1"), ("year", &year), ("Groceries", "10"), ("notes", "Café François ☕")],
        )
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (_, body) = client.get("/users/Zo%C3%AB/expenses").await;
    assert!(body.contains("Café François ☕"));
}

/// User input is escaped in rendered pages.
#[tokio::test]
async fn test_notes_are_escaped() {
    let client = TestClient::new();
    assert!(client.create_profile("asha", "50000").await);

    let year = chrono::Datelike::year(&chrono::Local::now()).to_string();
    client
        .post_form(
            "/users/asha/expenses",
            &[("month", "1"), ("year", &year), ("notes", "<script>alert(1)</script>")],
        )
        .await;

    let (_, body) = client.get("/users/asha/expenses").await;
    assert!(!body.contains("<script>alert(1)</script>"));
    assert!(body.contains("&lt;script&gt;"));
}
