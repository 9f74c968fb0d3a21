use std::fs;

use tracing::{info, warn};

use super::{read_document, validate_username, write_document, FileStore, PROFILE_SUFFIX};
use crate::error::{AppError, AppResult};
use crate::models::Profile;

/// Load a user's profile, or None when no readable profile document exists.
pub fn load_profile(store: &FileStore, username: &str) -> AppResult<Option<Profile>> {
    let path = store.user_file(username, PROFILE_SUFFIX)?;
    if !path.exists() {
        return Ok(None);
    }
    let profile: Option<Profile> = read_document(&path);
    Ok(profile)
}

/// Load a profile that must exist.
pub fn require_profile(store: &FileStore, username: &str) -> AppResult<Profile> {
    load_profile(store, username)?
        .ok_or_else(|| AppError::NotFound(format!("No profile named '{}'", username)))
}

/// Write the profile under its own name, replacing any previous document.
pub fn save_profile(store: &FileStore, profile: &Profile) -> AppResult<()> {
    let path = store.user_file(&profile.name, PROFILE_SUFFIX)?;
    write_document(&path, profile)?;
    info!(username = %profile.name, "Profile saved");
    Ok(())
}

pub fn profile_exists(store: &FileStore, username: &str) -> AppResult<bool> {
    Ok(store.user_file(username, PROFILE_SUFFIX)?.exists())
}

/// Names of all users with a profile document, sorted.
pub fn list_profiles(store: &FileStore) -> AppResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(store.data_dir())? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        let Some(name) = file_name.strip_suffix(PROFILE_SUFFIX) else {
            continue;
        };
        if validate_username(name).is_err() {
            warn!(file = %file_name, "Ignoring profile with unusable name");
            continue;
        }
        names.push(name.to_string());
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert!(load_profile(&store, "asha").unwrap().is_none());

        let profile = Profile::new("asha", 50000.0);
        save_profile(&store, &profile).unwrap();

        let loaded = load_profile(&store, "asha").unwrap().unwrap();
        assert_eq!(loaded, profile);
        assert!(profile_exists(&store, "asha").unwrap());
    }

    #[test]
    fn test_list_profiles_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        save_profile(&store, &Profile::new("zoe", 2000.0)).unwrap();
        save_profile(&store, &Profile::new("asha", 2000.0)).unwrap();
        fs::write(dir.path().join("asha_expenses.json"), "{}").unwrap();

        assert_eq!(list_profiles(&store).unwrap(), vec!["asha", "zoe"]);
    }

    #[test]
    fn test_corrupt_profile_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("asha_profile.json"), "[1, 2").unwrap();

        assert!(load_profile(&store, "asha").unwrap().is_none());
        assert!(matches!(
            require_profile(&store, "asha"),
            Err(AppError::NotFound(_))
        ));
    }
}
