//! Session identity provider
//!
//! Holds whoever is logged in and mirrors it to storage under its own key,
//! separate from the issue collection.

use crate::storage::Storage;
use ciras_model::User;
use parking_lot::RwLock;
use std::sync::Arc;

/// Current-user holder
#[derive(Debug)]
pub struct SessionProvider {
    storage: Arc<dyn Storage>,
    key: String,
    current: RwLock<Option<User>>,
}

impl SessionProvider {
    /// Rehydrate the session stored under `key`
    ///
    /// Missing or malformed records give an empty session.
    pub fn open(storage: Arc<dyn Storage>, key: impl Into<String>) -> Self {
        let key = key.into();
        let current = match storage.get(&key) {
            Ok(Some(text)) => serde_json::from_str::<User>(&text)
                .map_err(|e| tracing::warn!(key = %key, error = %e, "persisted session is malformed; ignoring"))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "could not read persisted session");
                None
            }
        };
        Self {
            storage,
            key,
            current: RwLock::new(current),
        }
    }

    /// Logged-in user, if any
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.current.read().clone()
    }

    /// Whether someone is logged in
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.current.read().is_some()
    }

    /// Replace the session identity and persist it
    pub fn set_current_user(&self, user: User) {
        match serde_json::to_string(&user) {
            Ok(text) => {
                if let Err(e) = self.storage.set(&self.key, &text) {
                    tracing::error!(key = %self.key, error = %e, "failed to persist session");
                }
            }
            Err(e) => tracing::error!(key = %self.key, error = %e, "failed to encode session"),
        }
        tracing::info!(user_id = %user.id, role = %user.role, "session started");
        *self.current.write() = Some(user);
    }

    /// Clear the session identity and its persisted record
    pub fn logout(&self) {
        let previous = self.current.write().take();
        if let Err(e) = self.storage.remove(&self.key) {
            tracing::error!(key = %self.key, error = %e, "failed to remove persisted session");
        }
        if let Some(user) = previous {
            tracing::info!(user_id = %user.id, "session ended");
        }
    }
}
