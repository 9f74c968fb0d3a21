//! XSRF protection for the form POSTs.
//!
//! One token is generated per server start and rendered into every form.
//! Mutating requests must echo it back as the `_xsrf_token` form field or
//! the `X-XSRF-Token` header.

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use uuid::Uuid;

use crate::error_pages::ErrorMessage;

pub const XSRF_HEADER: &str = "X-XSRF-Token";

pub const XSRF_FORM_FIELD: &str = "_xsrf_token";

/// Form bodies here are small; anything larger is rejected outright.
const MAX_FORM_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct XsrfToken(Arc<String>);

impl XsrfToken {
    pub fn generate() -> Self {
        Self(Arc::new(Uuid::new_v4().to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    fn matches(&self, candidate: &str) -> bool {
        candidate == self.value()
    }
}

/// Reject POST, PUT, DELETE and PATCH requests that do not carry the token.
pub async fn xsrf_middleware(xsrf_token: XsrfToken, request: Request<Body>, next: Next) -> Response {
    if !matches!(
        *request.method(),
        Method::POST | Method::PUT | Method::DELETE | Method::PATCH
    ) {
        return next.run(request).await;
    }

    let header_valid = request
        .headers()
        .get(XSRF_HEADER)
        .map(|v| v.to_str().is_ok_and(|token| xsrf_token.matches(token)));
    match header_valid {
        Some(true) => return next.run(request).await,
        Some(false) => return xsrf_error_response(request.uri().path()),
        None => {}
    }

    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if !is_form {
        return xsrf_error_response(request.uri().path());
    }

    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_FORM_BYTES).await {
        Ok(b) => b,
        Err(_) => return xsrf_error_response(parts.uri.path()),
    };

    let form_token = std::str::from_utf8(&bytes)
        .ok()
        .and_then(|body| form_field(body, XSRF_FORM_FIELD));

    match form_token {
        Some(token) if xsrf_token.matches(&token) => {
            next.run(Request::from_parts(parts, Body::from(bytes))).await
        }
        _ => xsrf_error_response(parts.uri.path()),
    }
}

/// Value of `field` in a url-encoded body.
fn form_field(body: &str, field: &str) -> Option<String> {
    body.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if decode(key)? != field {
            return None;
        }
        decode(value)
    })
}

fn decode(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .ok()
        .map(|s| s.into_owned())
}

fn xsrf_error_response(path: &str) -> Response {
    tracing::warn!(path = %path, "Rejected request without a valid XSRF token");
    let message = "Invalid or missing XSRF token".to_string();
    let mut response = (StatusCode::FORBIDDEN, message.clone()).into_response();
    response.extensions_mut().insert(ErrorMessage(message));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_field() {
        let body = "Groceries=100&_xsrf_token=abc-123&notes=a+b%26c";
        assert_eq!(form_field(body, XSRF_FORM_FIELD).as_deref(), Some("abc-123"));
        assert_eq!(form_field(body, "notes").as_deref(), Some("a b&c"));
        assert_eq!(form_field(body, "missing"), None);
        assert_eq!(form_field("", XSRF_FORM_FIELD), None);
    }

    #[test]
    fn test_token_matches_only_itself() {
        let token = XsrfToken::generate();
        let other = XsrfToken::generate();
        assert!(token.matches(token.value()));
        assert!(!token.matches(other.value()));
        assert!(!token.matches(""));
    }
}
