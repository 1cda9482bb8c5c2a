//! Session persistence — carries the chosen persona across page loads.
//!
//! Stores a single string value scoped to the browsing session. Every
//! implementation swallows read and write failures: a failed read is "no
//! prior persona" and a failed write leaves the previous value in place.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

// ─────────────────────────────────────────────────────────────────
// SessionStore Trait
// ─────────────────────────────────────────────────────────────────

/// Get/set one session-scoped string value. Infallible by contract.
pub trait SessionStore: Send + Sync {
    /// Read the stored persona id, if any.
    fn get(&self) -> Option<String>;

    /// Store a persona id. Failures are swallowed.
    fn set(&self, value: &str);

    /// Clear the stored value. Failures are swallowed.
    fn clear(&self);
}

/// Type alias for a shared session store reference
pub type SharedSessionStore = Arc<dyn SessionStore>;

// ─────────────────────────────────────────────────────────────────
// Memory Store
// ─────────────────────────────────────────────────────────────────

/// In-memory store, the default when no store file is configured.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    value: RwLock<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<String> {
        self.value.read().clone()
    }

    fn set(&self, value: &str) {
        *self.value.write() = Some(value.to_string());
    }

    fn clear(&self) {
        *self.value.write() = None;
    }
}

// ─────────────────────────────────────────────────────────────────
// File Store
// ─────────────────────────────────────────────────────────────────

/// File-backed store used by the CLI to persist the persona across runs.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let trimmed = content.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Session read failed, treating as empty");
                None
            }
        }
    }

    fn set(&self, value: &str) {
        if let Some(parent) = self.path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Err(e) = fs::write(&self.path, value) {
            debug!(path = %self.path.display(), error = %e, "Session write failed, keeping previous value");
        }
    }

    fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!(path = %self.path.display(), error = %e, "Session clear failed");
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemorySessionStore::new();
        assert!(store.get().is_none());

        store.set("gaming");
        assert_eq!(store.get().as_deref(), Some("gaming"));

        store.clear();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("session"));

        assert!(store.get().is_none());
        store.set("budget");
        assert_eq!(store.get().as_deref(), Some("budget"));

        store.clear();
        assert!(store.get().is_none());
    }

    #[test]
    fn test_file_store_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session"));

        store.set("compare");
        assert_eq!(store.get().as_deref(), Some("compare"));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let store = FileSessionStore::new("/nonexistent/path/session");
        assert!(store.get().is_none());
        // Write failure is swallowed
        store.set("gaming");
    }
}
