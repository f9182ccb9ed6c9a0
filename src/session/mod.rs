// src/session/mod.rs
// Session identity and the client-local storage behind it

pub mod identity;
pub mod storage;

pub use identity::{get_or_create_session_id, reset_session, SessionId, SESSION_KEY};
pub use storage::{FileStorage, LocalStorage, MemoryStorage};
