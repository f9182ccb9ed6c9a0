// src/dispatcher.rs
// Chat send flow: optimistic echo, request, correlated reply

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::{BackendClient, ChatRequest};
use crate::attachment::AttachmentRef;
use crate::conversation::{CorrelationId, Message, SharedConversation};
use crate::error::{ChatError, ChatResult};
use crate::mode::ResponseMode;
use crate::notice::SharedNotices;
use crate::session::SessionId;

/// Shown when the backend answers without a `reply`
pub const NO_RESPONSE_FALLBACK: &str = "No response received.";

/// Transient input state: what is typed and which mode is selected
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Composer {
    pub text: String,
    pub mode: Option<ResponseMode>,
}

impl Composer {
    pub fn new(text: impl Into<String>, mode: Option<ResponseMode>) -> Self {
        Self {
            text: text.into(),
            mode,
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.mode = None;
    }
}

/// A send whose user message is already on screen and whose request has
/// not gone out yet. Consumed by `ChatDispatcher::complete`, so each one
/// fills its slot at most once.
#[derive(Debug)]
pub struct PendingSend {
    correlation: CorrelationId,
    request: ChatRequest,
}

/// Something to send: non-blank text or a live attachment
pub fn can_send(text: &str, attachment: Option<&AttachmentRef>) -> bool {
    !text.trim().is_empty() || attachment.is_some()
}

#[derive(Clone)]
pub struct ChatDispatcher {
    backend: Arc<dyn BackendClient>,
    session_id: SessionId,
    conversation: SharedConversation,
    notices: SharedNotices,
}

impl ChatDispatcher {
    pub fn new(
        backend: Arc<dyn BackendClient>,
        session_id: SessionId,
        conversation: SharedConversation,
        notices: SharedNotices,
    ) -> Self {
        Self {
            backend,
            session_id,
            conversation,
            notices,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Echo the user message, reserve its reply slot and reset the composer.
    ///
    /// Returns `None` (and changes nothing) when there is nothing to send.
    /// The text goes out exactly as typed; only the blank check trims it.
    /// The attachment is read, never cleared.
    pub fn begin(&self, composer: &mut Composer, attachment: Option<&AttachmentRef>) -> Option<PendingSend> {
        if !can_send(&composer.text, attachment) {
            return None;
        }

        let text = std::mem::take(&mut composer.text);
        let mode = composer.mode;

        let correlation = {
            let mut conversation = self.conversation.lock();
            conversation.append_user(text.clone(), mode);
            conversation.reserve_reply(mode)
        };
        composer.clear();

        info!(
            session_id = %self.session_id,
            correlation = %correlation,
            mode = mode.map(|m| m.as_str()).unwrap_or("unset"),
            has_pdf = attachment.is_some(),
            "Sending chat message"
        );

        Some(PendingSend {
            correlation,
            request: ChatRequest {
                session_id: self.session_id.to_string(),
                user_message: text,
                pdf_path: attachment.map(|a| a.as_str().to_string()),
            },
        })
    }

    /// Post the request and fill the reserved slot.
    ///
    /// On failure the slot is dropped, an error notice is raised and the user
    /// message stays where it is. A reply for a slot that is no longer
    /// pending is discarded with `SlotSettled`.
    pub async fn complete(&self, pending: PendingSend) -> ChatResult<Message> {
        let PendingSend { correlation, request } = pending;

        match self.backend.chat(&request).await {
            Ok(reply) => {
                let content = reply.text().unwrap_or(NO_RESPONSE_FALLBACK).to_string();
                debug!(correlation = %correlation, reply_len = content.len(), "Reply received");

                let resolved = self.conversation.lock().resolve_reply(&correlation, content);
                let Some(message) = resolved else {
                    warn!(correlation = %correlation, "Reply slot already settled, dropping reply");
                    return Err(ChatError::SlotSettled(correlation.to_string()));
                };
                info!(correlation = %correlation, message_id = %message.id, "Assistant reply recorded");
                Ok(message)
            }
            Err(e) => {
                warn!(correlation = %correlation, error = %e, "Chat request failed");
                self.conversation.lock().abandon_reply(&correlation);
                self.notices.lock().error(e.user_notice());
                Err(e)
            }
        }
    }

    /// `begin` then `complete`. `Ok(None)` means there was nothing to send.
    pub async fn send(
        &self,
        composer: &mut Composer,
        attachment: Option<&AttachmentRef>,
    ) -> ChatResult<Option<Message>> {
        match self.begin(composer, attachment) {
            Some(pending) => self.complete(pending).await.map(Some),
            None => Ok(None),
        }
    }
}
