//! Session cookie cache.
//!
//! The server hands out a session cookie after a successful login. The
//! client keeps the last one it saw in a [`SessionStore`] so a later process
//! can reuse the session without logging in again.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use kismet_core::config::expand_home;
use kismet_core::error::{KisError, KisResult};

/// Key-value store holding session cookies by cookie name.
pub trait SessionStore: Send + Sync {
    /// Load the cached value of `name`, if any.
    fn load(&self, name: &str) -> KisResult<Option<String>>;

    /// Replace the cached value of `name`.
    fn save(&self, name: &str, value: &str) -> KisResult<()>;
}

/// Plaintext file holding the value of the last seen session cookie.
///
/// The file stores a single value, so the cookie name is not persisted.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Build a store from a path that may start with `~`.
    pub fn from_user_path(path: &str) -> KisResult<Self> {
        Ok(Self::new(expand_home(path)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self, _name: &str) -> KisResult<Option<String>> {
        if !self.path.is_file() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            KisError::SessionCache(format!("failed to read {}: {e}", self.path.display()))
        })?;
        let cookie = contents.trim();
        if cookie.is_empty() {
            Ok(None)
        } else {
            Ok(Some(cookie.to_string()))
        }
    }

    fn save(&self, _name: &str, value: &str) -> KisResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, value).map_err(|e| {
            KisError::SessionCache(format!("failed to write {}: {e}", self.path.display()))
        })?;
        debug!("session cookie cached at {}", self.path.display());
        Ok(())
    }
}

/// In-memory session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    cookies: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with one cookie.
    pub fn with_cookie(name: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut cookies) = store.cookies.lock() {
            cookies.insert(name.to_string(), value.to_string());
        }
        store
    }

    /// Current value of `name`, bypassing the trait's error type.
    pub fn get(&self, name: &str) -> Option<String> {
        self.cookies.lock().ok()?.get(name).cloned()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, name: &str) -> KisResult<Option<String>> {
        let cookies = self
            .cookies
            .lock()
            .map_err(|_| KisError::SessionCache("session store lock poisoned".into()))?;
        Ok(cookies.get(name).cloned())
    }

    fn save(&self, name: &str, value: &str) -> KisResult<()> {
        let mut cookies = self
            .cookies
            .lock()
            .map_err(|_| KisError::SessionCache("session store lock poisoned".into()))?;
        cookies.insert(name.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("session"));
        assert_eq!(store.load("KISMET").unwrap(), None);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache").join("session");
        let store = FileSessionStore::new(&path);
        store.save("KISMET", "0123abcd").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "0123abcd");
        assert_eq!(store.load("KISMET").unwrap().as_deref(), Some("0123abcd"));

        store.save("KISMET", "ffff").unwrap();
        assert_eq!(store.load("KISMET").unwrap().as_deref(), Some("ffff"));
    }

    #[test]
    fn test_file_store_blank_file_is_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session");
        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(FileSessionStore::new(&path).load("KISMET").unwrap(), None);
    }

    #[test]
    fn test_file_store_user_path() {
        let store = FileSessionStore::from_user_path("~/.kismet_session").unwrap();
        assert!(store.path().ends_with(".kismet_session"));
        assert!(!store.path().starts_with("~"));
    }

    #[test]
    fn test_memory_store() {
        let store = MemorySessionStore::with_cookie("KISMET", "abc");
        assert_eq!(store.load("KISMET").unwrap().as_deref(), Some("abc"));
        assert_eq!(store.load("OTHER").unwrap(), None);
        store.save("KISMET", "def").unwrap();
        assert_eq!(store.get("KISMET").as_deref(), Some("def"));
    }
}
