// src/api/contracts.rs
// Wire contracts for the two backend endpoints

use serde::{Deserialize, Serialize};

use crate::error::{ChatError, ChatResult};

pub const UPLOAD_PATH: &str = "/upload_pdf";
pub const CHAT_PATH: &str = "/chat";

/// Multipart form field carrying the PDF
pub const UPLOAD_FIELD: &str = "file";

/// 2xx body of `POST /upload_pdf`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UploadResponse {
    pub pdf_path: String,
}

/// JSON body of `POST /chat`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub session_id: String,
    #[serde(rename = "User_message")]
    pub user_message: String,
    pub pdf_path: Option<String>,
}

/// 2xx body of `POST /chat`; `reply` may legitimately be absent
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct ChatReply {
    #[serde(default)]
    pub reply: Option<String>,
}

impl ChatReply {
    /// The reply text, if the backend produced a non-blank one
    pub fn text(&self) -> Option<&str> {
        self.reply.as_deref().filter(|r| !r.trim().is_empty())
    }
}

pub fn parse_upload_response(body: &[u8]) -> ChatResult<UploadResponse> {
    let parsed: UploadResponse =
        serde_json::from_slice(body).map_err(|e| ChatError::malformed(UPLOAD_PATH, e))?;
    if parsed.pdf_path.trim().is_empty() {
        return Err(ChatError::malformed(UPLOAD_PATH, "pdf_path is empty"));
    }
    Ok(parsed)
}

pub fn parse_chat_reply(body: &[u8]) -> ChatResult<ChatReply> {
    serde_json::from_slice(body).map_err(|e| ChatError::malformed(CHAT_PATH, e))
}
