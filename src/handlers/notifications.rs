use askama::Template;
use axum::extract::{Path, Query, State};
use axum::response::{Html, Redirect};
use serde::Deserialize;
use tower_cookies::Cookies;
use tracing::{debug, info};

use super::SelectOption;
use crate::error::{AppError, AppResult, RenderHtml};
use crate::models::NotificationKind;
use crate::state::{AppState, PageContext};

const SAMPLE_NOTIFICATIONS: &[(&str, NotificationKind)] = &[
    ("Welcome to SmartSpend! Start by recording this month's expenses.", NotificationKind::Info),
    ("Your budget goals were created from your income.", NotificationKind::Success),
    ("Eating Out is close to its monthly budget.", NotificationKind::Warning),
    ("An expense entry could not be saved. Please try again.", NotificationKind::Error),
];

#[derive(Template)]
#[template(path = "pages/notifications.html")]
pub struct NotificationsTemplate {
    pub page: PageContext,
    pub filters: Vec<SelectOption>,
    pub items: Vec<NotificationView>,
    pub total: usize,
    pub unread: usize,
}

pub struct NotificationView {
    pub index: usize,
    pub message: String,
    pub kind: &'static str,
    pub kind_label: &'static str,
    pub timestamp: String,
    pub read: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct NotificationFilter {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl NotificationFilter {
    fn parse(&self) -> AppResult<Option<NotificationKind>> {
        match self.kind.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some(raw) => NotificationKind::parse(raw)
                .map(Some)
                .ok_or_else(|| AppError::Validation(format!("Unknown notification type '{}'", raw))),
        }
    }
}

pub async fn index(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(filter): Query<NotificationFilter>,
) -> AppResult<Html<String>> {
    let kind = filter.parse()?;

    let (items, total, unread) = state.sessions.peek(&cookies, |s| {
        let items: Vec<NotificationView> = s
            .notifications
            .newest_first(kind)
            .into_iter()
            .map(|(index, n)| NotificationView {
                index,
                message: n.message.clone(),
                kind: n.kind.as_str(),
                kind_label: n.kind.label(),
                timestamp: n.timestamp.clone(),
                read: n.read,
            })
            .collect();
        (items, s.notifications.len(), s.notifications.unread_count())
    });
    debug!(shown = items.len(), total, unread, "Listing notifications");

    let mut filters = vec![SelectOption::new("all", "All", kind.is_none())];
    filters.extend(
        NotificationKind::all()
            .iter()
            .map(|k| SelectOption::new(k.as_str(), k.label(), Some(*k) == kind)),
    );

    let template = NotificationsTemplate {
        page: state.page(&cookies, "Notifications", None),
        filters,
        items,
        total,
        unread,
    };

    template.render_html()
}

pub async fn mark_read(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(index): Path<usize>,
) -> AppResult<Redirect> {
    let found = state
        .sessions
        .with(&cookies, |s| s.notifications.mark_read(index));
    if !found {
        return Err(AppError::NotFound(format!("No notification #{}", index)));
    }
    debug!(index, "Notification marked read");
    Ok(Redirect::to("/notifications"))
}

pub async fn mark_all_read(State(state): State<AppState>, cookies: Cookies) -> Redirect {
    state
        .sessions
        .with(&cookies, |s| s.notifications.mark_all_read());
    debug!("All notifications marked read");
    Redirect::to("/notifications")
}

pub async fn generate_samples(State(state): State<AppState>, cookies: Cookies) -> Redirect {
    state.sessions.with(&cookies, |s| {
        for (message, kind) in SAMPLE_NOTIFICATIONS {
            s.notifications.push(*message, *kind);
        }
    });
    info!(count = SAMPLE_NOTIFICATIONS.len(), "Sample notifications generated");
    Redirect::to("/notifications")
}
