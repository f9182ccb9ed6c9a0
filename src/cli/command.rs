// src/cli/command.rs
// REPL input parsing

use std::path::PathBuf;

use crate::mode::ResponseMode;
use crate::notice::NoticeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Plain text: send it
    Say(String),
    Send,
    Attach(PathBuf),
    Detach,
    /// `None` clears the selection
    Mode(Option<ResponseMode>),
    /// 1-based index from the user, stored 0-based
    Suggest(Option<usize>),
    History,
    Notices,
    Dismiss(NoticeId),
    Session,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

/// Plain text is kept as typed; only commands are trimmed
pub fn parse_command(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return ReplCommand::Say(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name.to_lowercase().as_str() {
        "send" => ReplCommand::Send,
        "attach" | "upload" if !arg.is_empty() => ReplCommand::Attach(PathBuf::from(arg)),
        "attach" | "upload" => ReplCommand::Invalid("usage: /attach <path-to.pdf>".into()),
        "detach" => ReplCommand::Detach,
        "mode" => match arg {
            "" | "off" | "none" => ReplCommand::Mode(None),
            other => match other.parse() {
                Ok(mode) => ReplCommand::Mode(Some(mode)),
                Err(e) => ReplCommand::Invalid(format!("{}", e)),
            },
        },
        "suggest" | "s" => match arg {
            "" => ReplCommand::Suggest(None),
            n => match n.parse::<usize>() {
                Ok(n) if n >= 1 => ReplCommand::Suggest(Some(n - 1)),
                _ => ReplCommand::Invalid(format!("not a suggestion number: {}", n)),
            },
        },
        "history" => ReplCommand::History,
        "notices" => ReplCommand::Notices,
        "dismiss" => match arg.trim_start_matches('#').parse() {
            Ok(id) => ReplCommand::Dismiss(id),
            Err(_) => ReplCommand::Invalid("usage: /dismiss <id>".into()),
        },
        "session" => ReplCommand::Session,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => ReplCommand::Invalid(format!("unknown command /{} (try /help)", other)),
    }
}
