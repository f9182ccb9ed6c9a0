// src/app.rs
// ChatSession: wires identity, attachment, conversation and dispatcher together

use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::api::BackendClient;
use crate::attachment::{AttachmentRef, AttachmentSlot, AttachmentUploader};
use crate::config::{AttachmentPolicy, ClientConfig};
use crate::conversation::{ConversationStore, Message, SharedConversation};
use crate::dispatcher::{can_send, ChatDispatcher, Composer, PendingSend};
use crate::error::{ChatError, ChatResult};
use crate::mode::{ResponseMode, Suggestion, SUGGESTIONS};
use crate::notice::{Notice, NoticeBoard, NoticeId, SharedNotices};
use crate::session::{get_or_create_session_id, LocalStorage, SessionId};

/// Everything one chat window needs. Errors from user actions are turned
/// into notices here; nothing in a session is fatal.
pub struct ChatSession {
    session_id: SessionId,
    composer: Composer,
    attachment: AttachmentSlot,
    uploader: AttachmentUploader,
    dispatcher: ChatDispatcher,
    conversation: SharedConversation,
    notices: SharedNotices,
    policy: AttachmentPolicy,
}

impl ChatSession {
    /// Resolves the session id once; it is passed explicitly from here on.
    pub fn new(config: &ClientConfig, backend: Arc<dyn BackendClient>, storage: &dyn LocalStorage) -> Self {
        let session_id = get_or_create_session_id(storage);
        let conversation = ConversationStore::shared();
        let notices = NoticeBoard::shared(config.notice_ttl);
        let dispatcher = ChatDispatcher::new(
            backend.clone(),
            session_id.clone(),
            conversation.clone(),
            notices.clone(),
        );

        info!(session_id = %session_id, backend = %config.backend_url, "Chat session ready");

        Self {
            session_id,
            composer: Composer::default(),
            attachment: AttachmentSlot::new(),
            uploader: AttachmentUploader::new(backend),
            dispatcher,
            conversation,
            notices,
            policy: config.attachment_policy,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.composer.text = text.into();
    }

    pub fn select_mode(&mut self, mode: Option<ResponseMode>) {
        self.composer.mode = mode;
    }

    /// Pick a suggestion tile: selects its mode and fills in its prompt
    pub fn choose_suggestion(&mut self, index: usize) -> ChatResult<&'static Suggestion> {
        let suggestion = SUGGESTIONS.get(index).ok_or(ChatError::InvalidSuggestion {
            index: index + 1,
            available: SUGGESTIONS.len(),
        })?;
        self.composer.mode = Some(suggestion.mode);
        self.composer.text = suggestion.prompt.to_string();
        Ok(suggestion)
    }

    pub fn attachment(&self) -> Option<&AttachmentRef> {
        self.attachment.reference()
    }

    pub fn selected_file(&self) -> Option<&str> {
        self.attachment.selected_file()
    }

    /// Upload `path` and make it the live attachment. Attaching implies pdf mode.
    pub async fn attach_file(&mut self, path: &Path) -> ChatResult<AttachmentRef> {
        match self.attachment.attach(&self.uploader, path).await {
            Ok(reference) => {
                self.composer.mode = Some(ResponseMode::Pdf);
                let name = self.attachment.selected_file().unwrap_or_default().to_string();
                self.notices.lock().info(format!("Attached {}", name));
                Ok(reference)
            }
            Err(e) => {
                self.notices.lock().error(e.user_notice());
                Err(e)
            }
        }
    }

    pub fn detach(&mut self) {
        self.attachment.detach();
    }

    pub fn can_send(&self) -> bool {
        can_send(&self.composer.text, self.attachment.reference())
    }

    /// Synchronous half of a send; hand the result to `dispatcher().complete`
    /// to run it, possibly on another task.
    pub fn begin_send(&mut self) -> Option<PendingSend> {
        let pending = self.dispatcher.begin(&mut self.composer, self.attachment.reference())?;
        if self.policy == AttachmentPolicy::Clear {
            self.attachment.detach();
        }
        Some(pending)
    }

    /// Send the composer contents and wait for the reply
    pub async fn send(&mut self) -> ChatResult<Option<Message>> {
        match self.begin_send() {
            Some(pending) => self.dispatcher.complete(pending).await.map(Some),
            None => Ok(None),
        }
    }

    pub fn dispatcher(&self) -> &ChatDispatcher {
        &self.dispatcher
    }

    pub fn messages(&self) -> Vec<Message> {
        self.conversation.lock().list()
    }

    pub fn pending_replies(&self) -> usize {
        self.conversation.lock().pending_count()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().active(Utc::now())
    }

    pub fn new_notices(&self) -> Vec<Notice> {
        let mut board = self.notices.lock();
        board.prune(Utc::now());
        board.drain_new()
    }

    pub fn dismiss_notice(&self, id: NoticeId) -> bool {
        self.notices.lock().dismiss(id)
    }

    /// Shared handle for tasks that outlive a borrow of the session
    pub fn notice_board(&self) -> SharedNotices {
        self.notices.clone()
    }
}
