// src/api/mod.rs
// HTTP boundary to the RAG backend

pub mod contracts;
pub mod http;

use async_trait::async_trait;

use crate::error::ChatResult;

pub use contracts::{ChatReply, ChatRequest, UploadResponse, CHAT_PATH, UPLOAD_PATH};
pub use http::HttpBackend;

/// The two calls the client makes against the backend.
///
/// Upload failures surface as `ChatError::Upload`, chat failures as
/// `ChatError::Send`, and unparseable 2xx bodies as
/// `ChatError::MalformedResponse`.
#[async_trait]
pub trait BackendClient: Send + Sync {
    async fn upload_pdf(&self, file_name: &str, bytes: Vec<u8>) -> ChatResult<UploadResponse>;
    async fn chat(&self, request: &ChatRequest) -> ChatResult<ChatReply>;
}
