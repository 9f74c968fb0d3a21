use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Redirect;
use tower_cookies::Cookies;
use tracing::{debug, info};

use crate::state::AppState;

/// Flip between light and dark, then return to the page the toggle was on.
pub async fn toggle_theme(
    State(state): State<AppState>,
    cookies: Cookies,
    headers: HeaderMap,
) -> Redirect {
    let theme = state.sessions.with(&cookies, |s| {
        s.theme = s.theme.toggled();
        s.theme
    });
    debug!(theme = theme.as_str(), "Theme toggled");
    Redirect::to(&back_to(&headers))
}

/// Forget the session's notifications, theme and sample data.
pub async fn end_session(State(state): State<AppState>, cookies: Cookies) -> Redirect {
    state.sessions.end(&cookies);
    info!("Session ended");
    Redirect::to("/")
}

/// Same-site path from the Referer header, or `/`.
fn back_to(headers: &HeaderMap) -> String {
    headers
        .get(axum::http::header::REFERER)
        .and_then(|v| v.to_str().ok())
        .and_then(|referer| {
            let after_scheme = referer.split_once("://").map_or(referer, |(_, rest)| rest);
            after_scheme.find('/').map(|i| after_scheme[i..].to_string())
        })
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .unwrap_or_else(|| "/".to_string())
}
