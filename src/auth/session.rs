//! The logged-in administrator and its persisted copy

use std::sync::{PoisonError, RwLock};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::storage::{MemoryStorage, SessionStorage};
use crate::config::DEFAULT_SESSION_KEY;
use crate::error::Result;
use crate::normalize::{resolve_text, UserRole};

/// Session data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,

    #[serde(default)]
    pub email: String,

    pub name: String,

    /// Always [`UserRole::Admin`] for sessions created by this crate
    pub role: UserRole,

    #[serde(default)]
    pub contact_number: String,

    #[serde(default)]
    pub address: String,

    /// Bearer token attached to authenticated requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Session {
    /// Build an admin session from the account object of a login response
    pub fn from_account(account: &Value, token: Option<String>) -> Self {
        let id = resolve_text(account, &["/_id", "/id"]).unwrap_or_default();
        let email = resolve_text(account, &["/email"]).unwrap_or_default();
        let contact_number =
            resolve_text(account, &["/phoneNumber", "/contactNumber", "/phonenumber"]).unwrap_or_default();

        let name = resolve_text(account, &["/fullName", "/name"])
            .or_else(|| (!email.is_empty()).then(|| email.clone()))
            .or_else(|| (!contact_number.is_empty()).then(|| contact_number.clone()))
            .unwrap_or_else(|| "Admin".to_string());

        Self {
            id,
            email,
            name,
            role: UserRole::Admin,
            contact_number,
            address: resolve_text(account, &["/address"]).unwrap_or_default(),
            token,
        }
    }
}

/// Holds the current session and mirrors it to a [`SessionStorage`] slot.
///
/// All reads go through [`SessionStore::current`] and
/// [`SessionStore::token`]; nothing else touches the storage.
pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
    key: String,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Create a store over `storage`. A persisted session is picked up by
    /// [`SessionStore::load`], which `DispatchClient::with_session_store`
    /// calls for a store holding nothing yet.
    pub fn new(storage: impl SessionStorage + 'static, key: &str) -> Self {
        Self {
            storage: Box::new(storage),
            key: key.to_string(),
            current: RwLock::new(None),
        }
    }

    /// A store that forgets everything on exit
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new(), DEFAULT_SESSION_KEY)
    }

    /// Read the persisted session into memory.
    ///
    /// A value that does not parse is removed from storage and treated as no
    /// session at all.
    pub fn load(&self) -> Option<Session> {
        let loaded = match self.storage.get(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!("Discarding unreadable session under '{}': {}", self.key, e);
                    if let Err(e) = self.storage.remove(&self.key) {
                        warn!("Failed to remove unreadable session: {}", e);
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read session under '{}': {}", self.key, e);
                None
            }
        };

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = loaded.clone();
        loaded
    }

    /// Replace the current session and persist it.
    ///
    /// The in-memory session is replaced even if persisting fails.
    pub fn save(&self, session: Session) -> Result<()> {
        let raw = serde_json::to_string(&session)?;
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        self.storage.set(&self.key, &raw)
    }

    /// Forget the session in memory and in storage
    pub fn clear(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
        if let Err(e) = self.storage.remove(&self.key) {
            warn!("Failed to remove persisted session: {}", e);
        }
        info!("Session cleared");
    }

    /// The current session
    pub fn current(&self) -> Option<Session> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The bearer token of the current session, if any
    pub fn token(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("key", &self.key)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
