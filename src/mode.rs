// src/mode.rs
// Response modes and the suggestion tiles that select them

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ChatError;

/// How the backend should answer the next message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    /// Answer from the attached document
    Pdf,
    /// Answer with a web search
    Web,
    /// Plain model chat
    Llm,
}

impl ResponseMode {
    pub fn all() -> [ResponseMode; 3] {
        [ResponseMode::Pdf, ResponseMode::Web, ResponseMode::Llm]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseMode::Pdf => "pdf",
            ResponseMode::Web => "web",
            ResponseMode::Llm => "llm",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResponseMode::Pdf => "Document Q&A",
            ResponseMode::Web => "Web search",
            ResponseMode::Llm => "General chat",
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseMode {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" | "doc" | "document" => Ok(ResponseMode::Pdf),
            "web" | "search" => Ok(ResponseMode::Web),
            "llm" | "chat" => Ok(ResponseMode::Llm),
            other => Err(ChatError::Config(format!(
                "unknown response mode '{}' (expected pdf, web or llm)",
                other
            ))),
        }
    }
}

/// A clickable starter prompt; choosing it selects `mode`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub title: &'static str,
    pub prompt: &'static str,
    pub mode: ResponseMode,
}

pub static SUGGESTIONS: [Suggestion; 3] = [
    Suggestion {
        title: "Ask about a PDF",
        prompt: "Summarize the key points of the attached document.",
        mode: ResponseMode::Pdf,
    },
    Suggestion {
        title: "Search the web",
        prompt: "What are the latest developments in retrieval-augmented generation?",
        mode: ResponseMode::Web,
    },
    Suggestion {
        title: "Just chat",
        prompt: "Explain how vector embeddings work in simple terms.",
        mode: ResponseMode::Llm,
    },
];
