// src/api/http.rs
// reqwest-backed client for the RAG backend

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;

use super::contracts::{
    parse_chat_reply, parse_upload_response, ChatReply, ChatRequest, UploadResponse, CHAT_PATH,
    UPLOAD_FIELD, UPLOAD_PATH,
};
use super::BackendClient;
use crate::error::{ChatError, ChatResult};

#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> ChatResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ChatError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(base_url, client))
    }

    /// Use a preconfigured client (proxy settings, TLS roots, ...)
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Collect a response body, turning any non-2xx status into `HTTP <code> <detail>`
async fn read_success_body(response: reqwest::Response) -> Result<Vec<u8>, String> {
    let status = response.status();
    if !status.is_success() {
        let body = match response.text().await {
            Ok(body) => body.trim().to_string(),
            Err(_) => String::new(),
        };
        let detail = if body.is_empty() {
            "(empty response)".to_string()
        } else {
            body
        };
        return Err(format!("HTTP {} {}", status.as_u16(), detail));
    }

    response
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| format!("Failed to read response: {}", e))
}

#[async_trait]
impl BackendClient for HttpBackend {
    async fn upload_pdf(&self, file_name: &str, bytes: Vec<u8>) -> ChatResult<UploadResponse> {
        let url = self.url(UPLOAD_PATH);
        debug!(url = %url, file_name, size = bytes.len(), "Uploading PDF");

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| ChatError::Upload(format!("Failed to build form: {}", e)))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ChatError::Upload(format!("Request failed: {}", e)))?;

        let body = read_success_body(response).await.map_err(ChatError::Upload)?;
        parse_upload_response(&body)
    }

    async fn chat(&self, request: &ChatRequest) -> ChatResult<ChatReply> {
        let url = self.url(CHAT_PATH);
        debug!(
            url = %url,
            session_id = %request.session_id,
            has_pdf = request.pdf_path.is_some(),
            "Posting chat message"
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::Send(format!("Request failed: {}", e)))?;

        let body = read_success_body(response).await.map_err(ChatError::Send)?;
        parse_chat_reply(&body)
    }
}
