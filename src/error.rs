// src/error.rs
// Client error taxonomy

use std::io;
use thiserror::Error;

/// Result type for client operations
pub type ChatResult<T> = Result<T, ChatError>;

/// Every failure the client can surface to the user.
///
/// None of these are fatal: each one ends the call that raised it and the
/// session keeps going.
#[derive(Debug, Error)]
pub enum ChatError {
    // Attachments
    #[error("Unsupported attachment type: {0}")]
    InvalidAttachmentType(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    // Chat
    #[error("Send failed: {0}")]
    Send(String),

    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error("Reply dropped: slot {0} is already settled")]
    SlotSettled(String),

    // Composer
    #[error("No suggestion #{index} (choose 1-{available})")]
    InvalidSuggestion { index: usize, available: usize },

    // Local state
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChatError {
    pub fn malformed(endpoint: &str, reason: impl ToString) -> Self {
        ChatError::MalformedResponse {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    /// One-line text for a transient notice
    pub fn user_notice(&self) -> String {
        match self {
            ChatError::InvalidAttachmentType(name) => {
                format!("Only PDF files can be attached ({} was ignored)", name)
            }
            ChatError::Upload(_) => {
                "Failed to upload the PDF. Select the file again to retry.".to_string()
            }
            ChatError::Send(_) => "Failed to get a response from the assistant.".to_string(),
            ChatError::MalformedResponse { endpoint, .. } => {
                format!("The backend sent an unreadable response from {}.", endpoint)
            }
            other => other.to_string(),
        }
    }

    /// Whether the user can fix this by simply trying again
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ChatError::Upload(_)
                | ChatError::Send(_)
                | ChatError::MalformedResponse { .. }
                | ChatError::InvalidAttachmentType(_)
                | ChatError::InvalidSuggestion { .. }
        )
    }
}
