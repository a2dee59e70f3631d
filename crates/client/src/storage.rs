//! Persistent key-value storage behind the stores.
//!
//! The host application supplies the backend (browser local storage, a file,
//! a test map, ...) through the [`Storage`] trait. Storage is synchronous,
//! string-keyed, and offers no transactional guarantees across keys. Stores
//! treat read failures as absent values and write failures as best-effort -
//! persisted state is a convenience cache, never the source of truth for
//! anything except the session token and cart lines.

use std::collections::HashMap;
use std::sync::Mutex;

/// Well-known storage keys.
pub mod keys {
    /// Session bearer token.
    pub const TOKEN: &str = "token";
    /// Legacy serialized user blob; written by older clients, only ever
    /// cleared here.
    pub const USER: &str = "user";
    /// Serialized cart lines.
    pub const CART_ITEMS: &str = "cart.items";
    /// Serialized comparison selection.
    pub const COMPARISON_SELECTED: &str = "comparison.selectedProducts";
    /// Dark theme flag.
    pub const THEME_IS_DARK: &str = "theme.isDark";
}

/// A synchronous string key-value store.
pub trait Storage: Send + Sync {
    /// Read a value, `None` when absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, best-effort.
    fn set(&self, key: &str, value: &str);

    /// Remove a value, best-effort.
    fn remove(&self, key: &str);
}

/// In-memory [`Storage`] for tests and headless use.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.lock().insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(keys::TOKEN), None);

        storage.set(keys::TOKEN, "abc");
        assert_eq!(storage.get(keys::TOKEN), Some("abc".to_owned()));

        storage.set(keys::TOKEN, "def");
        assert_eq!(storage.get(keys::TOKEN), Some("def".to_owned()));

        storage.remove(keys::TOKEN);
        assert_eq!(storage.get(keys::TOKEN), None);
    }

    #[test]
    fn test_keys_are_independent() {
        let storage = MemoryStorage::new();
        storage.set(keys::CART_ITEMS, "[]");
        storage.set(keys::THEME_IS_DARK, "true");

        storage.remove(keys::CART_ITEMS);
        assert_eq!(storage.get(keys::THEME_IS_DARK), Some("true".to_owned()));
    }
}
