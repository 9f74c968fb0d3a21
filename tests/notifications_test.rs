//! Integration tests for session notifications, theme and session lifetime.

mod common;

use axum::http::StatusCode;
use common::TestClient;

/// Sample notifications can be generated, filtered and marked read.
#[tokio::test]
async fn test_notification_lifecycle() {
    let client = TestClient::new();

    let (status, body) = client.get("/notifications").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No notifications."));
    assert!(body.contains("Generate sample notifications"));

    let response = client.post_form_response("/notifications/samples", &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/notifications"));

    let (_, body) = client.get("/notifications").await;
    assert!(body.contains("4 unread of 4"));
    assert!(body.contains("class=\"badge\">4<"));

    let (_, body) = client.get("/notifications?type=error").await;
    assert!(body.contains("could not be saved"));
    assert!(!body.contains("Welcome to SmartSpend"));

    let (status, _) = client.post_form("/notifications/0/read", &[]).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    let (_, body) = client.get("/notifications").await;
    assert!(body.contains("3 unread of 4"));

    let (status, _) = client.post_form("/notifications/read-all", &[]).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    let (_, body) = client.get("/notifications").await;
    assert!(body.contains("0 unread of 4"));
    assert!(!body.contains("class=\"badge\""));
}

/// Marking a notification that does not exist is a 404.
#[tokio::test]
async fn test_mark_missing_notification() {
    let client = TestClient::new();
    let (status, _) = client.post_form("/notifications/7/read", &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Unknown type filters are rejected.
#[tokio::test]
async fn test_invalid_type_filter() {
    let client = TestClient::new();
    let (status, body) = client.get("/notifications?type=urgent").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Unknown notification type"));
}

/// Notifications belong to the browser session that raised them.
#[tokio::test]
async fn test_notifications_are_per_session() {
    let client = TestClient::new();
    assert!(client.create_profile("asha", "50000").await);

    let (_, body) = client.get("/notifications").await;
    assert!(body.contains("New profile created for asha"));

    client.clear_cookies();
    let (_, body) = client.get("/notifications").await;
    assert!(!body.contains("New profile created for asha"));
}

/// The theme toggle flips between light and dark and returns to the referring page.
#[tokio::test]
async fn test_theme_toggle() {
    let client = TestClient::new();

    let (_, body) = client.get("/").await;
    assert!(body.contains("data-theme=\"light\""));

    let response = client.post_form_response("/settings/theme", &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/"));

    let (_, body) = client.get("/").await;
    assert!(body.contains("data-theme=\"dark\""));

    client.post_form("/settings/theme", &[]).await;
    let (_, body) = client.get("/").await;
    assert!(body.contains("data-theme=\"light\""));
}

/// Ending the session discards notifications and theme.
#[tokio::test]
async fn test_end_session() {
    let client = TestClient::new();
    client.post_form("/notifications/samples", &[]).await;
    client.post_form("/settings/theme", &[]).await;
    assert_eq!(client.state().sessions.len(), 1);

    let response = client.post_form_response("/session/end", &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/"));
    assert!(client.state().sessions.is_empty());

    let (_, body) = client.get("/notifications").await;
    assert!(body.contains("No notifications."));
    assert!(body.contains("data-theme=\"light\""));
}
