// tests/chat_flow.rs
// End-to-end: real reqwest client against a stub actix-web backend

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{session_for, start_stub, write_pdf, Recorder};
use ragchat::conversation::Role;
use ragchat::dispatcher::NO_RESPONSE_FALLBACK;
use ragchat::mode::ResponseMode;
use ragchat::notice::NoticeLevel;
use ragchat::session::{FileStorage, MemoryStorage};
use ragchat::ChatError;
use serde_json::json;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn upload_then_ask_carries_pdf_path() {
    let recorder = Arc::new(Recorder::default());
    let url = start_stub(recorder.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let storage = MemoryStorage::new();
    let mut session = session_for(&url, &storage);

    let reference = session.attach_file(&write_pdf(&dir, "notes.pdf")).await.unwrap();
    assert_eq!(reference.as_str(), "/tmp/abc123.pdf");
    assert_eq!(session.attachment().map(|a| a.as_str()), Some("/tmp/abc123.pdf"));

    {
        let uploads = recorder.uploads.lock();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].field, "file");
        assert_eq!(uploads[0].filename, "notes.pdf");
        assert_eq!(uploads[0].content_type.as_deref(), Some("application/pdf"));
        assert!(uploads[0].size > 0);
    }

    session.set_text("What is the summary?");
    let reply = session.send().await.unwrap().unwrap();
    assert_eq!(reply.content, "Here is the summary.");
    assert_eq!(reply.source_mode, Some(ResponseMode::Pdf));

    let chats = recorder.chats.lock();
    assert_eq!(
        chats[0],
        json!({
            "session_id": session.session_id().as_str(),
            "User_message": "What is the summary?",
            "pdf_path": "/tmp/abc123.pdf"
        })
    );

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[1].role, Role::Assistant);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn plain_chat_sends_null_pdf_path() {
    let recorder = Arc::new(Recorder::default());
    let url = start_stub(recorder.clone()).await;
    let storage = MemoryStorage::new();
    let mut session = session_for(&url, &storage);

    session.select_mode(Some(ResponseMode::Web));
    session.set_text("latest rust release?");
    session.send().await.unwrap().unwrap();

    let chats = recorder.chats.lock();
    assert!(chats[0]["pdf_path"].is_null());
    assert_eq!(session.composer().mode, None);
    assert_eq!(session.messages()[1].source_mode, Some(ResponseMode::Web));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn empty_reply_falls_back() {
    let recorder = Arc::new(Recorder::default());
    recorder.set_chat_reply(200, "{}");
    let url = start_stub(recorder.clone()).await;
    let storage = MemoryStorage::new();
    let mut session = session_for(&url, &storage);

    session.set_text("hello?");
    let reply = session.send().await.unwrap().unwrap();
    assert_eq!(reply.content, NO_RESPONSE_FALLBACK);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn upload_500_leaves_reference_unset() {
    let recorder = Arc::new(Recorder::default());
    recorder.set_upload_reply(500, r#"{"detail": "parser crashed"}"#);
    let url = start_stub(recorder.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let storage = MemoryStorage::new();
    let mut session = session_for(&url, &storage);

    let err = session.attach_file(&write_pdf(&dir, "notes.pdf")).await.unwrap_err();
    match err {
        ChatError::Upload(detail) => assert!(detail.contains("500"), "{}", detail),
        other => panic!("expected upload error, got {:?}", other),
    }
    assert!(session.attachment().is_none());
    assert!(session.selected_file().is_none());

    let notices = session.new_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn non_pdf_never_reaches_backend() {
    let recorder = Arc::new(Recorder::default());
    let url = start_stub(recorder.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let txt = dir.path().join("notes.txt");
    std::fs::write(&txt, "just text").unwrap();
    let storage = MemoryStorage::new();
    let mut session = session_for(&url, &storage);

    let err = session.attach_file(&txt).await.unwrap_err();
    assert!(matches!(err, ChatError::InvalidAttachmentType(_)));
    assert!(recorder.uploads.lock().is_empty());
    assert!(session.attachment().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_chat_keeps_only_user_message() {
    let recorder = Arc::new(Recorder::default());
    recorder.set_chat_reply(502, "");
    let url = start_stub(recorder.clone()).await;
    let storage = MemoryStorage::new();
    let mut session = session_for(&url, &storage);

    session.set_text("are you there?");
    let err = session.send().await.unwrap_err();
    assert!(matches!(err, ChatError::Send(_)));

    let messages = session.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "are you there?");
    assert_eq!(session.pending_replies(), 0);
    assert_eq!(session.new_notices().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn malformed_success_body_is_reported() {
    let recorder = Arc::new(Recorder::default());
    recorder.set_chat_reply(200, "<html>gateway page</html>");
    let url = start_stub(recorder.clone()).await;
    let storage = MemoryStorage::new();
    let mut session = session_for(&url, &storage);

    session.set_text("hi");
    let err = session.send().await.unwrap_err();
    assert!(matches!(err, ChatError::MalformedResponse { .. }));
    assert_eq!(session.messages().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blank_send_is_noop() {
    let recorder = Arc::new(Recorder::default());
    let url = start_stub(recorder.clone()).await;
    let storage = MemoryStorage::new();
    let mut session = session_for(&url, &storage);

    session.set_text("   ");
    assert!(session.send().await.unwrap().is_none());
    assert!(session.messages().is_empty());
    assert!(recorder.chats.lock().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn session_id_survives_restart() {
    let recorder = Arc::new(Recorder::default());
    let url = start_stub(recorder.clone()).await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    for text in ["first run", "second run"] {
        let storage = FileStorage::new(&path);
        let mut session = session_for(&url, &storage);
        session.set_text(text);
        session.send().await.unwrap();
    }

    let chats = recorder.chats.lock();
    assert_eq!(chats.len(), 2);
    assert_eq!(chats[0]["session_id"], chats[1]["session_id"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_sends_keep_request_order() {
    let recorder = Arc::new(Recorder::default());
    recorder.chat_delays.lock().extend([
        ("slow".to_string(), Duration::from_millis(400)),
        ("fast".to_string(), Duration::from_millis(10)),
    ]);
    let url = start_stub(recorder.clone()).await;
    let storage = MemoryStorage::new();
    let mut session = session_for(&url, &storage);

    session.set_text("slow");
    let slow = session.begin_send().unwrap();
    session.set_text("fast");
    let fast = session.begin_send().unwrap();
    assert_eq!(session.messages().len(), 2);

    let dispatcher = session.dispatcher().clone();
    let (slow_reply, fast_reply) = tokio::join!(dispatcher.complete(slow), dispatcher.complete(fast));
    assert!(fast_reply.unwrap().created_at <= slow_reply.unwrap().created_at);

    let contents: Vec<_> = session.messages().into_iter().map(|m| m.content).collect();
    assert_eq!(contents, ["slow", "re: slow", "fast", "re: fast"]);
}
