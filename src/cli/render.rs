// src/cli/render.rs
// Terminal rendering of messages, notices and help

use colored::Colorize;
use std::io::Write;

use crate::conversation::{Message, Role};
use crate::mode::{ResponseMode, SUGGESTIONS};
use crate::notice::{Notice, NoticeLevel};

pub fn message_line(message: &Message) -> String {
    let time = message.created_at.format("%H:%M:%S").to_string().dimmed();
    let mode = message
        .source_mode
        .map(|m| format!(" [{}]", m))
        .unwrap_or_default();
    match message.role {
        Role::User => format!("{} {}{} › {}", time, "you".cyan().bold(), mode.dimmed(), message.content),
        Role::Assistant => format!(
            "{} {}{} › {}",
            time,
            "assistant".green().bold(),
            mode.dimmed(),
            message.content
        ),
    }
}

pub fn notice_line(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Error => format!("{} {} (#{})", "✖".red().bold(), notice.text.red(), notice.id),
        NoticeLevel::Info => format!("{} {} (#{})", "ℹ".yellow(), notice.text, notice.id),
    }
}

pub fn print_message(message: &Message) {
    println!("{}", message_line(message));
}

pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        eprintln!("{}", notice_line(notice));
    }
}

pub fn prompt(mode: Option<ResponseMode>, attached: Option<&str>) {
    let mut parts = Vec::new();
    if let Some(mode) = mode {
        parts.push(mode.as_str().to_string());
    }
    if let Some(file) = attached {
        parts.push(format!("📎 {}", file));
    }
    let context = if parts.is_empty() {
        String::new()
    } else {
        format!("({}) ", parts.join(", "))
    };
    print!("{}{} ", context.dimmed(), ">".bold());
    let _ = std::io::stdout().flush();
}

pub fn banner(session_id: &str, backend: &str) {
    println!("{}", "🚀 ragchat".bold());
    println!("   backend: {}", backend);
    println!("   session: {}", session_id.dimmed());
    println!();
    suggestions();
    println!("Type a question, or /help for commands.");
}

pub fn suggestions() {
    for (i, tile) in SUGGESTIONS.iter().enumerate() {
        println!(
            "  {} {} {}",
            format!("[{}]", i + 1).bold(),
            tile.title,
            format!("({})", tile.mode.label()).dimmed()
        );
    }
}

pub fn help() {
    println!("Commands:");
    println!("  /attach <path>     upload a PDF and use it for following questions");
    println!("  /detach            forget the current PDF");
    println!("  /mode <pdf|web|llm|off>  select the response mode for the next message");
    println!("  /suggest [n]       list suggestions, or load suggestion n into the input");
    println!("  /send              send the loaded input (or just the attached PDF)");
    println!("  /history           print the conversation so far");
    println!("  /notices           show active notices");
    println!("  /dismiss <id>      dismiss a notice");
    println!("  /session           show the session id");
    println!("  /quit              wait for pending replies and exit");
}
