//! API key storage
//!
//! The chat pipeline never reads these; they are held for clients that
//! configure downstream integrations through the UI. Kept behind a trait
//! so a persistent store can be injected without touching the handlers.

use std::collections::HashMap;
use std::sync::RwLock;

/// Key-value store for client-supplied API keys.
pub trait ApiKeyStore: Send + Sync {
    /// Store or replace a key
    fn set(&self, name: &str, value: &str);

    /// Look up a key by name
    fn get(&self, name: &str) -> Option<String>;
}

/// Process-local store with no expiry or per-client scoping.
#[derive(Debug, Default)]
pub struct InMemoryKeyStore {
    keys: RwLock<HashMap<String, String>>,
}

impl ApiKeyStore for InMemoryKeyStore {
    fn set(&self, name: &str, value: &str) {
        let mut keys = self.keys.write().unwrap_or_else(|e| e.into_inner());
        keys.insert(name.to_string(), value.to_string());
    }

    fn get(&self, name: &str) -> Option<String> {
        let keys = self.keys.read().unwrap_or_else(|e| e.into_inner());
        keys.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let store = InMemoryKeyStore::default();
        store.set("openai", "sk-test");

        assert_eq!(store.get("openai"), Some("sk-test".to_string()));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_set_replaces() {
        let store = InMemoryKeyStore::default();
        store.set("k", "old");
        store.set("k", "new");

        assert_eq!(store.get("k"), Some("new".to_string()));
    }
}
