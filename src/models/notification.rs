use serde::{Deserialize, Serialize};

use crate::date_utils::now_timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn all() -> &'static [NotificationKind] {
        &[Self::Info, Self::Success, Self::Warning, Self::Error]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub timestamp: String,
    pub read: bool,
}

/// Notifications raised during one browser session. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    items: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>, kind: NotificationKind) {
        self.push_at(message, kind, now_timestamp());
    }

    pub fn push_at(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        timestamp: String,
    ) {
        self.items.push(Notification {
            message: message.into(),
            kind,
            timestamp,
            read: false,
        });
    }

    /// Notifications newest first, paired with the index `mark_read` expects.
    ///
    /// Entries sharing a timestamp keep reverse insertion order.
    pub fn newest_first(&self, kind: Option<NotificationKind>) -> Vec<(usize, &Notification)> {
        let mut list: Vec<(usize, &Notification)> = self
            .items
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, n)| kind.map_or(true, |k| n.kind == k))
            .collect();
        list.sort_by(|a, b| b.1.timestamp.cmp(&a.1.timestamp));
        list
    }

    pub fn mark_read(&mut self, index: usize) -> bool {
        match self.items.get_mut(index) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_all_read(&mut self) {
        for n in &mut self.items {
            n.read = true;
        }
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
