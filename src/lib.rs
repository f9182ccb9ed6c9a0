pub mod path_manager;
pub mod config;
pub mod error;
pub mod api;
pub mod session;
pub mod mode;
pub mod attachment;
pub mod conversation;
pub mod notice;
pub mod dispatcher;
pub mod app;
pub mod monitoring;
pub mod cli;

pub use app::ChatSession;
pub use error::{ChatError, ChatResult};
