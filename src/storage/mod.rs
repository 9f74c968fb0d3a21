//! Per-user JSON documents on local disk.
//!
//! Every read loads the whole document and every write replaces it. There is
//! no locking: two concurrent writers to the same file race and the last one
//! wins. A missing or unparseable document reads as the empty value.

pub mod budgets;
pub mod expenses;
pub mod profiles;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

pub const PROFILE_SUFFIX: &str = "_profile.json";
pub const EXPENSES_SUFFIX: &str = "_expenses.json";
pub const BUDGET_SUFFIX: &str = "_budget.json";

pub const MAX_USERNAME_LEN: usize = 64;

#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    /// Open the store, creating the data directory if needed.
    pub fn open(data_dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn user_file(&self, username: &str, suffix: &str) -> AppResult<PathBuf> {
        validate_username(username)?;
        Ok(self.data_dir.join(format!("{}{}", username, suffix)))
    }
}

/// Usernames become file names, so only a conservative character set is allowed.
pub fn validate_username(username: &str) -> AppResult<()> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Name must not be empty".into()));
    }
    if trimmed != username {
        return Err(AppError::Validation(
            "Name must not start or end with spaces".into(),
        ));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::Validation(format!(
            "Name must be at most {} characters",
            MAX_USERNAME_LEN
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | ' '))
    {
        return Err(AppError::Validation(
            "Name may only contain letters, digits, spaces, '_' and '-'".into(),
        ));
    }
    Ok(())
}

fn read_document<T: DeserializeOwned + Default>(path: &Path) -> T {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return T::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not read document, treating as empty");
            return T::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Malformed document, treating as empty");
            T::default()
        }
    }
}

fn write_document<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    let json = serde_json::to_string(value)?;
    fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "Document written");
    Ok(())
}
