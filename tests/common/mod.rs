//! Shared test utilities for integration tests.
//!
//! This module provides a `TestClient` that drives the full application
//! router against a temporary data directory. It keeps the session cookie
//! between requests so notifications and theme behave like in a browser.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use smartspend::config::Config;
use smartspend::server;
use smartspend::state::AppState;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;
use tower::ServiceExt;

/// A test client that simulates a browser session, allowing sequential requests
/// against the application.
pub struct TestClient {
    dir: TempDir,
    state: AppState,
    app: Router,
    cookie: Mutex<Option<String>>,
}

/// Status, `Location` header and body of a response.
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestClient {
    /// Create a client with an empty data directory and sample data disabled.
    pub fn new() -> Self {
        Self::with_sample_data(false)
    }

    pub fn with_sample_data(sample_data: bool) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = Config {
            host: "127.0.0.1".into(),
            port: 0,
            data_dir: dir.path().to_path_buf(),
            static_path: "static".into(),
            sample_data,
            ..Config::default()
        };
        let (state, app) = server::build_app(config).expect("Failed to build app");

        Self {
            dir,
            state,
            app,
            cookie: Mutex::new(None),
        }
    }

    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Write a raw document into the data directory.
    pub fn write_file(&self, name: &str, content: &str) {
        std::fs::write(self.dir.path().join(name), content).expect("Failed to write file");
    }

    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Forget the session cookie, as if a new browser connected.
    pub fn clear_cookies(&self) {
        *self.cookie.lock().unwrap() = None;
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        for value in response.headers().get_all(header::SET_COOKIE) {
            let value = value.to_str().unwrap();
            let pair = value.split(';').next().unwrap_or_default().trim();
            if let Some(token) = pair.strip_prefix("smartspend_session=") {
                let mut cookie = self.cookie.lock().unwrap();
                *cookie = if token.is_empty() {
                    None
                } else {
                    Some(pair.to_string())
                };
            }
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let body = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            location,
            body: String::from_utf8_lossy(&body).to_string(),
        }
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = self.cookie.lock().unwrap().as_ref() {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self.get_response(uri).await;
        (response.status, response.body)
    }

    pub async fn get_response(&self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// Make a POST request with form data and return status and body.
    pub async fn post_form(&self, uri: &str, form_data: &[(&str, &str)]) -> (StatusCode, String) {
        let response = self.post_form_response(uri, form_data).await;
        (response.status, response.body)
    }

    pub async fn post_form_response(&self, uri: &str, form_data: &[(&str, &str)]) -> TestResponse {
        let token = self.state.xsrf_token.value().to_string();
        let mut form = vec![("_xsrf_token", token.as_str())];
        form.extend_from_slice(form_data);
        self.post_form_unprotected(uri, &form).await
    }

    /// POST form data exactly as given, without adding the XSRF token.
    pub async fn post_form_unprotected(&self, uri: &str, form_data: &[(&str, &str)]) -> TestResponse {
        let body = form_data
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Get JSON from an endpoint and parse it.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        uri: &str,
    ) -> (StatusCode, Option<T>) {
        let (status, body) = self.get(uri).await;
        let parsed = serde_json::from_str(&body).ok();
        (status, parsed)
    }

    // =========================================================================
    // Helper methods for creating data through the web forms
    // =========================================================================

    /// Create a profile with the given income and return success status.
    pub async fn create_profile(&self, name: &str, income: &str) -> bool {
        let (status, _) = self
            .post_form(
                "/profiles/create",
                &[
                    ("name", name),
                    ("age", "30"),
                    ("occupation", "Professional"),
                    ("city_tier", "Tier_1"),
                    ("income", income),
                    ("dependents", "0"),
                    ("desired_savings_percentage", "20"),
                    ("financial_goals", ""),
                    ("risk_profile", "Moderate"),
                ],
            )
            .await;
        // Redirect (303) indicates success
        status == StatusCode::SEE_OTHER
    }

    /// Record an expense entry for a month and return success status.
    pub async fn add_expenses(
        &self,
        username: &str,
        month: &str,
        year: &str,
        amounts: &[(&str, &str)],
    ) -> bool {
        let mut form = vec![("month", month), ("year", year), ("notes", "")];
        form.extend_from_slice(amounts);
        let uri = format!("/users/{}/expenses", urlencoding::encode(username));
        let (status, _) = self.post_form(&uri, &form).await;
        status == StatusCode::SEE_OTHER
    }

    /// Save budget goals and return success status.
    pub async fn set_budget(&self, username: &str, goals: &[(&str, &str)]) -> bool {
        let uri = format!("/users/{}/budget", urlencoding::encode(username));
        let (status, _) = self.post_form(&uri, goals).await;
        status == StatusCode::SEE_OTHER
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
