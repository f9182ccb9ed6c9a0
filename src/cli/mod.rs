// src/cli/mod.rs
// Command-line surface for the ragchat binary

pub mod command;
pub mod render;
pub mod repl;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::mode::ResponseMode;

#[derive(Debug, Parser)]
#[command(name = "ragchat", version, about = "Chat with a RAG backend from the terminal")]
pub struct Cli {
    /// Backend base URL (overrides RAGCHAT_BACKEND_URL)
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// Keep the session id in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Interactive chat (default)
    Chat,
    /// Send one message and print the reply
    Ask {
        text: String,
        /// Upload this PDF first and ask about it
        #[arg(long)]
        pdf: Option<PathBuf>,
        /// Response mode: pdf, web or llm
        #[arg(long)]
        mode: Option<ResponseMode>,
    },
    /// Upload a PDF and print the reference the backend assigned
    Upload { file: PathBuf },
    /// Show the stored session id
    Session {
        /// Forget the stored id so the next run starts a new session
        #[arg(long)]
        reset: bool,
    },
}
