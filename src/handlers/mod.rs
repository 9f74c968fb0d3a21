pub mod analytics;
pub mod api;
pub mod budget;
pub mod dashboard;
pub mod expenses;
pub mod notifications;
pub mod profiles;
pub mod settings;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        // Profiles
        .route("/", get(profiles::index))
        .route("/profiles/create", post(profiles::create))
        .route("/users/:username", get(dashboard::index))
        .route(
            "/users/:username/profile",
            get(profiles::edit_form).post(profiles::update),
        )
        // Expenses
        .route(
            "/users/:username/expenses",
            get(expenses::index).post(expenses::create),
        )
        // Budget
        .route(
            "/users/:username/budget",
            get(budget::index).post(budget::update),
        )
        .route("/users/:username/analytics", get(analytics::index))
        // Notifications
        .route("/notifications", get(notifications::index))
        .route("/notifications/:index/read", post(notifications::mark_read))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/notifications/samples", post(notifications::generate_samples))
        // Settings
        .route("/settings/theme", post(settings::toggle_theme))
        .route("/session/end", post(settings::end_session))
        // API (JSON for charts)
        .route("/api/users/:username/summary", get(api::summary))
        .route("/api/users/:username/analytics", get(api::analytics))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}

/// Base URL of a user's pages.
pub(crate) fn user_url(username: &str) -> String {
    format!("/users/{}", urlencoding::encode(username))
}

/// An `<option>` in a rendered `<select>`.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected,
        }
    }
}
