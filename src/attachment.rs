// src/attachment.rs
// PDF attachment: type check, upload, and the live backend reference

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::BackendClient;
use crate::error::{ChatError, ChatResult};

pub const PDF_MIME: &str = "application/pdf";

/// Server-assigned handle for an uploaded document (`pdf_path`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentRef(String);

impl AttachmentRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AttachmentRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for AttachmentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A local file that passed the PDF check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFile {
    path: PathBuf,
    name: String,
}

impl PdfFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Accept only files whose media type is `application/pdf`.
///
/// This is the caller-side check; it never touches the network.
pub fn check_pdf(path: &Path) -> ChatResult<PdfFile> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    let is_pdf = mime_guess::from_path(path)
        .iter()
        .any(|m| m.essence_str() == PDF_MIME);
    if name.is_empty() || !is_pdf {
        let shown = if name.is_empty() {
            path.display().to_string()
        } else {
            name
        };
        return Err(ChatError::InvalidAttachmentType(shown));
    }

    Ok(PdfFile {
        path: path.to_path_buf(),
        name,
    })
}

/// Sends PDFs to the backend. One attempt per call, no retry.
#[derive(Clone)]
pub struct AttachmentUploader {
    backend: Arc<dyn BackendClient>,
}

impl AttachmentUploader {
    pub fn new(backend: Arc<dyn BackendClient>) -> Self {
        Self { backend }
    }

    pub async fn upload(&self, file: &PdfFile) -> ChatResult<AttachmentRef> {
        let bytes = tokio::fs::read(file.path())
            .await
            .map_err(|e| ChatError::Upload(format!("Cannot read {}: {}", file.path().display(), e)))?;
        let size = bytes.len();

        let response = self.backend.upload_pdf(file.name(), bytes).await?;
        info!(file = %file.name(), size, pdf_path = %response.pdf_path, "PDF uploaded");
        Ok(AttachmentRef(response.pdf_path))
    }
}

/// The single live attachment plus the file name shown next to the input
#[derive(Debug, Default, Clone)]
pub struct AttachmentSlot {
    reference: Option<AttachmentRef>,
    selected: Option<String>,
}

impl AttachmentSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reference(&self) -> Option<&AttachmentRef> {
        self.reference.as_ref()
    }

    pub fn selected_file(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Check, upload and record `path`.
    ///
    /// A non-PDF leaves the slot untouched. A failed upload clears both the
    /// reference and the selected file so the user can pick again.
    pub async fn attach(&mut self, uploader: &AttachmentUploader, path: &Path) -> ChatResult<AttachmentRef> {
        let file = check_pdf(path)?;
        self.selected = Some(file.name().to_string());

        match uploader.upload(&file).await {
            Ok(reference) => {
                self.reference = Some(reference.clone());
                Ok(reference)
            }
            Err(e) => {
                warn!(file = %file.name(), error = %e, "Upload failed, clearing attachment");
                self.detach();
                Err(e)
            }
        }
    }

    pub fn detach(&mut self) {
        self.reference = None;
        self.selected = None;
    }
}
