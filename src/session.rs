//! Per-browser session state.
//!
//! A random UUID in the `smartspend_session` cookie keys into an in-memory
//! map. Sessions hold the notification list, the theme and any generated
//! sample ledgers. Idle sessions expire and the number of live sessions is
//! capped. Everything is lost on server restart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

use crate::models::{ExpenseLedger, NotificationCenter};

pub const SESSION_COOKIE: &str = "smartspend_session";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub theme: Theme,
    pub notifications: NotificationCenter,
    /// Generated ledgers keyed by username, kept so reloads show the same numbers.
    pub sample_data: HashMap<String, ExpenseLedger>,
}

/// Sessions idle for longer than this are dropped on the next access.
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(12 * 60 * 60);

/// Upper bound on live sessions; the least recently seen one is evicted first.
pub const MAX_SESSIONS: usize = 1024;

#[derive(Debug)]
struct Entry {
    state: SessionState,
    last_seen: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, Entry>>>,
    idle_timeout: Duration,
    capacity: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(SESSION_IDLE_TIMEOUT, MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(idle_timeout: Duration, capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `f` against the caller's session, starting a new one if the
    /// cookie is missing or unknown.
    pub fn with<R>(&self, cookies: &Cookies, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut sessions = self.lock();
        let now = Instant::now();
        self.sweep(&mut sessions, now);

        let existing = cookies
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|token| sessions.contains_key(token));

        let token = match existing {
            Some(token) => token,
            None => {
                self.make_room(&mut sessions);
                let token = Uuid::new_v4().to_string();
                tracing::debug!(live = sessions.len(), "Starting new session");
                cookies.add(session_cookie(token.clone()));
                token
            }
        };

        let entry = sessions.entry(token).or_insert_with(|| Entry {
            state: SessionState::default(),
            last_seen: now,
        });
        entry.last_seen = now;
        f(&mut entry.state)
    }

    /// Like [`SessionStore::with`], but only for a session that already
    /// exists. Returns `None` without creating one otherwise.
    pub fn with_existing<R>(
        &self,
        cookies: &Cookies,
        f: impl FnOnce(&mut SessionState) -> R,
    ) -> Option<R> {
        let mut sessions = self.lock();
        let now = Instant::now();
        self.sweep(&mut sessions, now);

        let cookie = cookies.get(SESSION_COOKIE)?;
        let entry = sessions.get_mut(cookie.value())?;
        entry.last_seen = now;
        Some(f(&mut entry.state))
    }

    /// Read-only view of the caller's session; a missing session reads as default.
    pub fn peek<R>(&self, cookies: &Cookies, f: impl FnOnce(&SessionState) -> R) -> R {
        let sessions = self.lock();
        match cookies
            .get(SESSION_COOKIE)
            .and_then(|c| sessions.get(c.value()))
            .filter(|entry| entry.last_seen.elapsed() <= self.idle_timeout)
        {
            Some(entry) => f(&entry.state),
            None => f(&SessionState::default()),
        }
    }

    /// Drop the caller's session and clear the cookie.
    pub fn end(&self, cookies: &Cookies) {
        if let Some(cookie) = cookies.get(SESSION_COOKIE) {
            self.lock().remove(cookie.value());
        }
        cookies.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn sweep(&self, sessions: &mut HashMap<String, Entry>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) <= self.idle_timeout);
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::debug!(expired, "Expired idle sessions");
        }
    }

    fn make_room(&self, sessions: &mut HashMap<String, Entry>) {
        while sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(token, _)| token.clone());
            match oldest {
                Some(token) => {
                    sessions.remove(&token);
                    tracing::debug!("Evicted least recently seen session");
                }
                None => break,
            }
        }
    }
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
