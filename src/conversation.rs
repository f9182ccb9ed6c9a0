// src/conversation.rs
// In-memory conversation for one client session

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::mode::ResponseMode;

pub type SharedConversation = Arc<Mutex<ConversationStore>>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One exchanged message. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// Time-ordered (UUID v7)
    pub id: String,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub source_mode: Option<ResponseMode>,
}

impl Message {
    fn new(role: Role, content: String, source_mode: Option<ResponseMode>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            role,
            content,
            created_at: Utc::now(),
            source_mode,
        }
    }
}

/// Ties an outgoing request to the reply slot reserved for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
enum Slot {
    Ready(Message),
    Pending { mode: Option<ResponseMode> },
    Abandoned,
}

/// Ordered message list. Replies are written into the slot reserved when
/// their request went out, so concurrent sends cannot interleave out of
/// order.
#[derive(Debug, Default)]
pub struct ConversationStore {
    slots: Vec<Slot>,
    pending: HashMap<CorrelationId, usize>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedConversation {
        Arc::new(Mutex::new(Self::new()))
    }

    pub fn append_user(&mut self, content: impl Into<String>, mode: Option<ResponseMode>) -> Message {
        self.push(Message::new(Role::User, content.into(), mode))
    }

    pub fn append_assistant(
        &mut self,
        content: impl Into<String>,
        mode: Option<ResponseMode>,
    ) -> Message {
        self.push(Message::new(Role::Assistant, content.into(), mode))
    }

    fn push(&mut self, message: Message) -> Message {
        self.slots.push(Slot::Ready(message.clone()));
        message
    }

    /// Hold a position for an assistant reply that has not arrived yet
    pub fn reserve_reply(&mut self, mode: Option<ResponseMode>) -> CorrelationId {
        let id = CorrelationId::new();
        self.pending.insert(id, self.slots.len());
        self.slots.push(Slot::Pending { mode });
        id
    }

    /// Fill a reserved slot. Returns `None` if the id is unknown or already settled.
    pub fn resolve_reply(&mut self, id: &CorrelationId, content: impl Into<String>) -> Option<Message> {
        let index = self.pending.remove(id)?;
        let mode = match self.slots.get(index) {
            Some(Slot::Pending { mode }) => *mode,
            _ => return None,
        };
        let message = Message::new(Role::Assistant, content.into(), mode);
        self.slots[index] = Slot::Ready(message.clone());
        Some(message)
    }

    /// Give up on a reserved slot; it never becomes visible
    pub fn abandon_reply(&mut self, id: &CorrelationId) -> bool {
        match self.pending.remove(id) {
            Some(index) => {
                self.slots[index] = Slot::Abandoned;
                true
            }
            None => false,
        }
    }

    /// Visible messages in display order
    pub fn list(&self) -> Vec<Message> {
        self.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Ready(message) => Some(message),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replies still awaited
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
