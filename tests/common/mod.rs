// tests/common/mod.rs
// Stub RAG backend served by actix-web on an ephemeral port

#![allow(dead_code)]

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer};
use futures_util::stream::StreamExt;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use ragchat::api::HttpBackend;
use ragchat::config::ClientConfig;
use ragchat::session::LocalStorage;
use ragchat::ChatSession;

#[derive(Debug, Clone)]
pub struct SeenUpload {
    pub field: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub size: usize,
}

/// Records what the client sent and replies with canned responses
pub struct Recorder {
    pub uploads: Mutex<Vec<SeenUpload>>,
    pub chats: Mutex<Vec<serde_json::Value>>,
    pub upload_reply: Mutex<(u16, String)>,
    pub chat_reply: Mutex<(u16, String)>,
    /// Per-message delays, to force replies out of send order
    pub chat_delays: Mutex<Vec<(String, Duration)>>,
}

impl Default for Recorder {
    fn default() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            chats: Mutex::new(Vec::new()),
            upload_reply: Mutex::new((200, r#"{"pdf_path": "/tmp/abc123.pdf"}"#.to_string())),
            chat_reply: Mutex::new((200, r#"{"reply": "Here is the summary."}"#.to_string())),
            chat_delays: Mutex::new(Vec::new()),
        }
    }
}

impl Recorder {
    pub fn set_upload_reply(&self, status: u16, body: &str) {
        *self.upload_reply.lock() = (status, body.to_string());
    }

    pub fn set_chat_reply(&self, status: u16, body: &str) {
        *self.chat_reply.lock() = (status, body.to_string());
    }
}

fn respond(reply: &(u16, String)) -> HttpResponse {
    let status = StatusCode::from_u16(reply.0).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status)
        .content_type("application/json")
        .body(reply.1.clone())
}

async fn upload_pdf(
    recorder: web::Data<Recorder>,
    mut payload: Multipart,
) -> Result<HttpResponse, actix_web::Error> {
    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field.name().map(str::to_string).unwrap_or_default();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();
        let content_type = field.content_type().map(|m| m.essence_str().to_string());

        let mut size = 0;
        while let Some(chunk) = field.next().await {
            size += chunk?.len();
        }

        recorder.uploads.lock().push(SeenUpload {
            field: name,
            filename,
            content_type,
            size,
        });
    }

    let reply = recorder.upload_reply.lock().clone();
    Ok(respond(&reply))
}

async fn chat(recorder: web::Data<Recorder>, body: web::Json<serde_json::Value>) -> HttpResponse {
    let body = body.into_inner();
    let message = body["User_message"].as_str().unwrap_or_default().to_string();
    recorder.chats.lock().push(body);

    let delay = recorder
        .chat_delays
        .lock()
        .iter()
        .find(|(text, _)| *text == message)
        .map(|(_, d)| *d);
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
        return HttpResponse::Ok().json(serde_json::json!({ "reply": format!("re: {}", message) }));
    }

    let reply = recorder.chat_reply.lock().clone();
    respond(&reply)
}

/// Start the stub and return its base URL
pub async fn start_stub(recorder: Arc<Recorder>) -> String {
    let data = web::Data::from(recorder);
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/upload_pdf", web::post().to(upload_pdf))
            .route("/chat", web::post().to(chat))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind stub backend");

    let addr = server.addrs()[0];
    tokio::spawn(server.run());
    format!("http://{}", addr)
}

pub fn session_for(base_url: &str, storage: &dyn LocalStorage) -> ChatSession {
    let mut config = ClientConfig::default();
    config.set_backend_url(base_url.to_string()).unwrap();
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap();
    let backend = Arc::new(HttpBackend::with_client(&config.backend_url, client));
    ChatSession::new(&config, backend, storage)
}

pub fn write_pdf(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"%PDF-1.4\n1 0 obj << >> endobj\n%%EOF\n").unwrap();
    path
}
