//! Durable client-side token storage
//!
//! A store holds three independent string entries. There is no atomicity
//! across them: an interrupted write can leave the triple inconsistent, and
//! readers must cope with any subset being present.

use crate::error::StoreResult;
use crate::types::StoredSession;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::warn;

/// The three persisted session fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    AccessToken,
    RefreshToken,
    ExpiresAt,
}

impl StoreKey {
    pub const ALL: [Self; 3] = [Self::AccessToken, Self::RefreshToken, Self::ExpiresAt];

    /// Storage key as used on the wire and in browser storage
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "accessToken",
            Self::RefreshToken => "refreshToken",
            Self::ExpiresAt => "expiresAt",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synchronous key/value storage for session fields
///
/// Implementations must survive a process (or page) restart unless they are
/// explicitly in-memory.
pub trait TokenStore {
    /// Read a field; `Ok(None)` when absent
    fn get(&self, key: StoreKey) -> StoreResult<Option<String>>;

    /// Write a field, replacing any previous value
    fn set(&self, key: StoreKey, value: &str) -> StoreResult<()>;

    /// Delete a field; deleting an absent field succeeds
    fn remove(&self, key: StoreKey) -> StoreResult<()>;
}

impl<T: TokenStore + ?Sized> TokenStore for Rc<T> {
    fn get(&self, key: StoreKey) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: StoreKey, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: StoreKey) -> StoreResult<()> {
        (**self).remove(key)
    }
}

/// Read all three fields, treating empty strings as absent
pub fn load_session<S: TokenStore + ?Sized>(store: &S) -> StoreResult<StoredSession> {
    let read = |key| -> StoreResult<Option<String>> {
        Ok(store.get(key)?.filter(|value| !value.is_empty()))
    };

    Ok(StoredSession {
        access_token: read(StoreKey::AccessToken)?,
        refresh_token: read(StoreKey::RefreshToken)?,
        expires_at: read(StoreKey::ExpiresAt)?,
    })
}

/// Remove all three fields
///
/// Every key is attempted even if an earlier removal fails; the first error
/// is returned.
pub fn clear_session<S: TokenStore + ?Sized>(store: &S) -> StoreResult<()> {
    let mut first_error = None;
    for key in StoreKey::ALL {
        if let Err(err) = store.remove(key) {
            warn!(key = %key, error = %err, "Failed to remove session field");
            if first_error.is_none() {
                first_error = Some(err);
            }
        }
    }
    first_error.map_or(Ok(()), Err)
}

/// In-memory store; clones share the same entries
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<StoreKey, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given fields
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (StoreKey, &'a str)>) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().extend(
            entries
                .into_iter()
                .map(|(key, value)| (key, value.to_string())),
        );
        store
    }

    /// Number of fields currently stored
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl TokenStore for MemoryStore {
    fn get(&self, key: StoreKey) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(&key).cloned())
    }

    fn set(&self, key: StoreKey, value: &str) -> StoreResult<()> {
        self.entries.borrow_mut().insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StoreKey) -> StoreResult<()> {
        self.entries.borrow_mut().remove(&key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use super::{StoreKey, TokenStore};
    use crate::error::StoreResult;
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};
    use tracing::debug;

    /// Store backed by a JSON file
    ///
    /// The file is read on every `get` and rewritten on every `set`/`remove`,
    /// so several handles on the same path observe each other's writes.
    #[derive(Debug, Clone)]
    pub struct FileStore {
        path: PathBuf,
    }

    impl FileStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_entries(&self) -> StoreResult<BTreeMap<String, String>> {
            match std::fs::read_to_string(&self.path) {
                Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
                Ok(content) => Ok(serde_json::from_str(&content)?),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
                Err(err) => Err(err.into()),
            }
        }

        fn write_entries(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let content = serde_json::to_string_pretty(entries)?;
            std::fs::write(&self.path, content)?;
            debug!(path = %self.path.display(), "Token store written");
            Ok(())
        }
    }

    impl TokenStore for FileStore {
        fn get(&self, key: StoreKey) -> StoreResult<Option<String>> {
            Ok(self.read_entries()?.remove(key.as_str()))
        }

        fn set(&self, key: StoreKey, value: &str) -> StoreResult<()> {
            let mut entries = self.read_entries()?;
            entries.insert(key.as_str().to_string(), value.to_string());
            self.write_entries(&entries)
        }

        fn remove(&self, key: StoreKey) -> StoreResult<()> {
            let mut entries = self.read_entries()?;
            if entries.remove(key.as_str()).is_some() {
                self.write_entries(&entries)?;
            }
            Ok(())
        }
    }
}
