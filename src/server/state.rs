//! Shared state for HTTP handlers

use std::sync::Arc;

use crate::chat::InferenceEngine;

use super::keys::{ApiKeyStore, InMemoryKeyStore};

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The inference engine, loaded once at startup
    pub engine: Arc<InferenceEngine>,
    /// Injected key-value store for client API keys
    pub api_keys: Arc<dyn ApiKeyStore>,
}

impl AppState {
    /// Build state around an engine with the default in-memory key store.
    pub fn new(engine: Arc<InferenceEngine>) -> Self {
        Self {
            engine,
            api_keys: Arc::new(InMemoryKeyStore::default()),
        }
    }

    /// Replace the key store implementation.
    pub fn with_key_store(mut self, store: Arc<dyn ApiKeyStore>) -> Self {
        self.api_keys = store;
        self
    }
}
