//! # Session Store
//!
//! Durable key-value storage for the logged-in session.
//!
//! ## Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Session Persistence                              │
//! │                                                                         │
//! │   SessionManager ──(writes)──┐                                         │
//! │                              ▼                                          │
//! │                       ┌──────────────┐        ┌──────────────────────┐ │
//! │   ApiClient ─(reads)─►│ SessionStore │───────►│ dyn KeyValueStore    │ │
//! │                       │  jwt_token   │        │  FileStore (disk)    │ │
//! │                       │  user (JSON) │        │  MemoryStore (tests) │ │
//! │                       └──────────────┘        └──────────────────────┘ │
//! │                                                                         │
//! │   session.json                                                         │
//! │   { "jwt_token": "eyJ...", "user": "{\"userId\":1,...}" }              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use billing_core::SessionUser;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "jwt_token";

/// Key holding the JSON-encoded [`SessionUser`].
pub const USER_KEY: &str = "user";

// =============================================================================
// Key-Value Contract
// =============================================================================

/// String key-value storage that survives restarts.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> ClientResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&self, key: &str) -> ClientResult<()>;
}

fn poisoned<T>(_: T) -> ClientError {
    ClientError::Store("store lock poisoned".into())
}

// =============================================================================
// File Store
// =============================================================================

/// All keys in one JSON object file.
///
/// Writes go to a sibling temp file that is renamed over the original, so a
/// crash mid-write leaves the previous contents intact.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> ClientResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(map)?)?;
        std::fs::rename(&tmp, &self.path)?;

        debug!(path = ?self.path, keys = map.len(), "Session file written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let _guard = self.lock.lock().map_err(poisoned)?;
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.entries.lock().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.entries
            .lock()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.entries.lock().map_err(poisoned)?.remove(key);
        Ok(())
    }
}

// =============================================================================
// Session + Typed Wrapper
// =============================================================================

/// The authenticated identity and the credential for API calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

/// Typed view over a [`KeyValueStore`]. Cheap to clone; clones share the
/// same backend.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        SessionStore {
            backend: Arc::new(backend),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileStore::new(path))
    }

    /// Current bearer token. A failed read counts as no token.
    pub fn token(&self) -> Option<String> {
        match self.backend.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                None
            }
        }
    }

    /// The persisted session, if both halves are present and the user
    /// decodes.
    pub fn load(&self) -> ClientResult<Option<Session>> {
        let Some(token) = self.token() else {
            return Ok(None);
        };
        let Some(raw_user) = self.backend.get(USER_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str::<SessionUser>(&raw_user) {
            Ok(user) => Ok(Some(Session { token, user })),
            Err(e) => {
                warn!(error = %e, "Persisted user is unreadable, ignoring session");
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &Session) -> ClientResult<()> {
        let user = serde_json::to_string(&session.user)?;
        self.backend.set(TOKEN_KEY, &session.token)?;
        self.backend.set(USER_KEY, &user)
    }

    /// Removes both keys. Both removals are attempted; the first failure is
    /// returned.
    pub fn clear(&self) -> ClientResult<()> {
        let token = self.backend.remove(TOKEN_KEY);
        let user = self.backend.remove(USER_KEY);
        token.and(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cashier() -> SessionUser {
        SessionUser {
            id: 3,
            username: "asha".into(),
            email: None,
            full_name: "Asha Rao".into(),
            role: "CASHIER".into(),
        }
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("session.json");

        FileStore::new(&path).set(TOKEN_KEY, "abc").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get(TOKEN_KEY).unwrap(), Some("abc".to_string()));
        assert!(!path.with_extension("json.tmp").exists());

        reopened.remove(TOKEN_KEY).unwrap();
        assert_eq!(FileStore::new(&path).get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.get(TOKEN_KEY), Err(ClientError::Store(_))));
    }

    #[test]
    fn test_session_save_load_clear() {
        let store = SessionStore::in_memory();
        assert_eq!(store.load().unwrap(), None);

        let session = Session {
            token: "jwt-1".into(),
            user: cashier(),
        };
        store.save(&session).unwrap();
        assert_eq!(store.token(), Some("jwt-1".to_string()));
        assert_eq!(store.load().unwrap(), Some(session));

        store.clear().unwrap();
        assert_eq!(store.token(), None);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_session_requires_both_halves() {
        let backend = MemoryStore::new();
        backend.set(TOKEN_KEY, "jwt-1").unwrap();
        backend.set(USER_KEY, "{broken").unwrap();

        let store = SessionStore::new(backend);
        assert_eq!(store.load().unwrap(), None);
    }
}
