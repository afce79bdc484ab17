//! Host session storage.
//!
//! The host owns the store; connectors read the raw token from it and may only
//! clear it as a whole.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::{AuthError, AuthResult, BearerToken, SESSION_KEY, VIEWER_KEYS};

/// Key/value store provided by the host.
pub trait SessionStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, or remove it with `None`.
    fn set(&self, key: &str, value: Option<String>);

    /// Remove several keys as one unit.
    ///
    /// Implementations backed by shared state should override this so that no
    /// reader observes a partially cleared set.
    fn clear_all(&self, keys: &[&str]) {
        for key in keys {
            self.set(key, None);
        }
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Option<String>) {
        (**self).set(key, value);
    }

    fn clear_all(&self, keys: &[&str]) {
        (**self).clear_all(keys);
    }
}

/// In-memory session store.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all stored keys.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: Option<String>) {
        let mut values = self.values.write();
        match value {
            Some(value) => {
                values.insert(key.to_string(), value);
            }
            None => {
                values.remove(key);
            }
        }
    }

    fn clear_all(&self, keys: &[&str]) {
        let mut values = self.values.write();
        for key in keys {
            values.remove(*key);
        }
    }
}

/// Session helpers over a [`SessionStore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Session;

impl Session {
    /// Read the stored bearer token.
    ///
    /// Empty values and the `"null"`/`"undefined"` markers some hosts write for
    /// cleared entries count as absent.
    pub fn read_token(store: &dyn SessionStore) -> AuthResult<BearerToken> {
        match store.get(SESSION_KEY) {
            Some(raw) if !raw.is_empty() && raw != "null" && raw != "undefined" => {
                Ok(BearerToken::new(raw))
            }
            _ => Err(AuthError::NotAuthenticated),
        }
    }

    /// Store a freshly issued token.
    pub fn store_token(store: &dyn SessionStore, token: &BearerToken) {
        store.set(SESSION_KEY, Some(token.as_str().to_string()));
    }

    /// Clear the token and every piece of viewer state derived from it.
    pub fn clear(store: &dyn SessionStore) {
        let mut keys = Vec::with_capacity(VIEWER_KEYS.len() + 1);
        keys.push(SESSION_KEY);
        keys.extend_from_slice(&VIEWER_KEYS);
        store.clear_all(&keys);
        info!("session cleared");
    }
}
