use std::sync::Arc;

use chrono::Local;
use tower_cookies::Cookies;

use crate::config::Config;
use crate::error::AppResult;
use crate::filters;
use crate::handlers::user_url;
use crate::models::{BudgetGoals, ExpenseLedger, NotificationKind, Profile};
use crate::services::sample_data::{generate_sample_data, SAMPLE_MONTHS};
use crate::session::SessionStore;
use crate::storage::{budgets, expenses, FileStore};
use crate::xsrf::XsrfToken;
use crate::VERSION;

#[derive(Clone)]
pub struct AppState {
    pub store: FileStore,
    pub config: Arc<Config>,
    pub sessions: SessionStore,
    pub xsrf_token: XsrfToken,
}

/// Fields every full page needs for the layout.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub title: String,
    pub version: &'static str,
    pub theme: &'static str,
    pub unread_notifications: usize,
    pub has_unread: bool,
    pub username: String,
    pub user_url: String,
    pub has_user: bool,
    pub xsrf_token: String,
}

/// A user's expenses, or generated sample data when they have none yet.
pub struct UserLedger {
    pub ledger: ExpenseLedger,
    pub is_sample: bool,
}

impl AppState {
    pub fn new(store: FileStore, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
            sessions: SessionStore::new(),
            xsrf_token: XsrfToken::generate(),
        }
    }

    pub fn page(&self, cookies: &Cookies, title: &str, username: Option<&str>) -> PageContext {
        let (theme, unread) = self
            .sessions
            .peek(cookies, |s| (s.theme, s.notifications.unread_count()));
        PageContext {
            title: title.to_string(),
            version: VERSION,
            theme: theme.as_str(),
            unread_notifications: unread,
            has_unread: unread > 0,
            username: username.unwrap_or_default().to_string(),
            user_url: username.map(user_url).unwrap_or_default(),
            has_user: username.is_some(),
            xsrf_token: self.xsrf_token.value().to_string(),
        }
    }

    pub fn notify(&self, cookies: &Cookies, message: impl Into<String>, kind: NotificationKind) {
        let message = message.into();
        tracing::debug!(kind = kind.as_str(), message = %message, "Notification raised");
        self.sessions
            .with(cookies, |s| s.notifications.push(message, kind));
    }

    pub fn money(&self, value: f64) -> String {
        filters::format_amount(value, &self.config.currency_symbol)
    }

    /// Load the user's ledger, substituting cached sample data when it is empty.
    pub fn user_ledger(&self, cookies: &Cookies, username: &str) -> AppResult<UserLedger> {
        let ledger = expenses::load_all(&self.store, username)?;
        if !ledger.is_empty() || !self.config.sample_data {
            return Ok(UserLedger {
                ledger,
                is_sample: false,
            });
        }

        let generate = || {
            generate_sample_data(
                Local::now().naive_local(),
                SAMPLE_MONTHS,
                &mut rand::thread_rng(),
            )
        };
        // Only an existing session caches the ledger; cookie-less readers get a fresh one.
        let sample = self
            .sessions
            .with_existing(cookies, |s| {
                s.sample_data
                    .entry(username.to_string())
                    .or_insert_with(generate)
                    .clone()
            })
            .unwrap_or_else(generate);
        Ok(UserLedger {
            ledger: sample,
            is_sample: true,
        })
    }

    /// Saved goals, or the income-based defaults. The flag tells whether they were saved.
    pub fn budget_goals(&self, username: &str, profile: &Profile) -> AppResult<(BudgetGoals, bool)> {
        Ok(match budgets::load_budget_goals(&self.store, username)? {
            Some(goals) => (goals, true),
            None => (BudgetGoals::default_for_income(profile.income), false),
        })
    }
}
