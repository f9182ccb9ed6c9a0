// src/session/identity.rs
// Durable per-profile session identifier

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};
use uuid::Uuid;

use super::storage::LocalStorage;
use crate::error::ChatResult;

/// Storage key holding the session identifier
pub const SESSION_KEY: &str = "chat_session_id";

/// Opaque identifier the backend uses to group a user's conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Fresh random identifier (UUID v4)
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Return the stored session id, creating and persisting one on first use.
///
/// Never fails: if the storage cannot be read or written the caller still gets
/// a usable id, it just won't survive a restart.
pub fn get_or_create_session_id(storage: &dyn LocalStorage) -> SessionId {
    match storage.get(SESSION_KEY) {
        Ok(Some(existing)) if !existing.trim().is_empty() => return SessionId(existing),
        Ok(_) => {}
        Err(e) => {
            warn!(error = %e, "Local storage unreadable, using a throwaway session id");
            return SessionId::generate();
        }
    }

    let id = SessionId::generate();
    match storage.set(SESSION_KEY, id.as_str()) {
        Ok(()) => info!(session_id = %id, "Created new chat session id"),
        Err(e) => warn!(error = %e, "Failed to persist session id"),
    }
    id
}

/// Forget the stored id; the next `get_or_create_session_id` mints a new one
pub fn reset_session(storage: &dyn LocalStorage) -> ChatResult<()> {
    storage.remove(SESSION_KEY)
}
