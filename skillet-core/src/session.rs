//! Session store - durable key-value state for the logged-in user
//!
//! Backed by `session.json` in the app directory so the session survives
//! process restarts. All operations are synchronous and local; every
//! mutation is persisted immediately. The in-memory state sits behind a
//! mutex so access stays explicit and single-writer.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::domain::result::{Error, Result};
use crate::domain::Session;

const SESSION_FILE: &str = "session.json";

/// Durable store for the current session
pub struct SessionStore {
    path: PathBuf,
    state: Mutex<Session>,
}

impl SessionStore {
    /// Open the session store, creating an empty session on first access
    pub fn open(app_dir: &Path) -> Result<Self> {
        let path = app_dir.join(SESSION_FILE);

        let session = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            Session::default()
        };

        Ok(Self {
            path,
            state: Mutex::new(session),
        })
    }

    /// ID of the logged-in user
    ///
    /// Fails with `Error::NotFound` when no session exists; callers should
    /// check `is_logged_in` before use rather than rely on the error for
    /// control flow.
    pub fn user_id(&self) -> Result<i64> {
        self.lock()
            .user_id
            .ok_or_else(|| Error::not_found("no active session"))
    }

    pub fn user_name(&self) -> Option<String> {
        self.lock().user_name.clone()
    }

    /// Bearer token of the logged-in user
    pub fn auth_token(&self) -> Result<String> {
        self.lock()
            .auth_token
            .clone()
            .ok_or_else(|| Error::not_found("no active session"))
    }

    pub fn is_logged_in(&self) -> bool {
        self.lock().is_logged_in()
    }

    /// Record a successful login
    pub fn set_user(&self, id: i64, name: &str, token: &str) -> Result<()> {
        self.mutate(|s| {
            s.user_id = Some(id);
            s.user_name = Some(name.to_string());
            s.auth_token = Some(token.to_string());
        })
    }

    /// The locally cached favorite set, `None` when not yet known
    pub fn favorite_ids(&self) -> Option<BTreeSet<i64>> {
        self.lock().favorite_ids.clone()
    }

    pub fn set_favorite_ids(&self, ids: BTreeSet<i64>) -> Result<()> {
        self.mutate(|s| s.favorite_ids = Some(ids))
    }

    /// Add a recipe to the cached favorite set
    pub fn add_favorite(&self, recipe_id: i64) -> Result<()> {
        self.mutate(|s| {
            s.favorite_ids
                .get_or_insert_with(BTreeSet::new)
                .insert(recipe_id);
        })
    }

    /// Remove a recipe from the cached favorite set
    pub fn remove_favorite(&self, recipe_id: i64) -> Result<()> {
        self.mutate(|s| {
            if let Some(ids) = s.favorite_ids.as_mut() {
                ids.remove(&recipe_id);
            }
        })
    }

    pub fn dark_mode(&self) -> bool {
        self.lock().dark_mode
    }

    pub fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        self.mutate(|s| s.dark_mode = enabled)
    }

    /// Clear the session on logout (theme preference survives)
    pub fn clear(&self) -> Result<()> {
        self.mutate(|s| s.clear())
    }

    /// Snapshot of the whole session (for status displays)
    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Session> {
        // Session mutations never panic while holding the lock
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn mutate<F: FnOnce(&mut Session)>(&self, f: F) -> Result<()> {
        let mut state = self.lock();
        f(&mut state);
        let content = serde_json::to_string_pretty(&*state)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_user_id_fails_without_session() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path()).unwrap();
        assert!(matches!(store.user_id(), Err(Error::NotFound(_))));
        assert!(!store.is_logged_in());
    }

    #[test]
    fn test_session_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = SessionStore::open(dir.path()).unwrap();
            store.set_user(7, "Ada", "token-7").unwrap();
            store.add_favorite(3).unwrap();
            store.set_dark_mode(true).unwrap();
        }

        let store = SessionStore::open(dir.path()).unwrap();
        assert_eq!(store.user_id().unwrap(), 7);
        assert_eq!(store.auth_token().unwrap(), "token-7");
        assert_eq!(store.favorite_ids().unwrap(), [3].into_iter().collect());
        assert!(store.dark_mode());
    }

    #[test]
    fn test_add_remove_favorite() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path()).unwrap();

        // Favorite set starts unknown, not empty
        assert!(store.favorite_ids().is_none());

        store.add_favorite(1).unwrap();
        store.add_favorite(2).unwrap();
        store.remove_favorite(1).unwrap();
        assert_eq!(store.favorite_ids().unwrap(), [2].into_iter().collect());
    }

    #[test]
    fn test_clear_drops_user_and_favorites_keeps_theme() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::open(dir.path()).unwrap();
        store.set_user(1, "Ada", "t").unwrap();
        store.set_favorite_ids([1, 2].into_iter().collect()).unwrap();
        store.set_dark_mode(true).unwrap();

        store.clear().unwrap();

        assert!(store.user_id().is_err());
        assert!(store.favorite_ids().is_none());
        assert!(store.dark_mode());

        // Cleared state is what a reopen sees too
        let reopened = SessionStore::open(dir.path()).unwrap();
        assert!(!reopened.is_logged_in());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SESSION_FILE), "not json").unwrap();
        let store = SessionStore::open(dir.path()).unwrap();
        assert!(!store.is_logged_in());
    }
}
