// src/cli/repl.rs
// Interactive loop and one-shot commands

use futures_util::future::join_all;
use std::io;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::command::{parse_command, ReplCommand};
use super::render;
use crate::app::ChatSession;
use crate::error::{ChatError, ChatResult};
use crate::mode::ResponseMode;
use crate::session::{reset_session, LocalStorage, SESSION_KEY};

/// Run the REPL until EOF or `/quit`. Sends run concurrently; each reply is
/// printed when it arrives.
pub async fn run_repl(mut session: ChatSession, backend_url: &str) -> ChatResult<()> {
    render::banner(session.session_id().as_str(), backend_url);

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut buf = Vec::new();
    let mut in_flight: Vec<JoinHandle<()>> = Vec::new();

    loop {
        render::print_notices(&session.new_notices());
        render::prompt(session.composer().mode, session.selected_file());

        let line = match read_line_lossy(&mut stdin, &mut buf).await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                // Stop reading but still wait for replies already in flight
                warn!(error = %e, "Failed to read input");
                println!("Input error: {}", e);
                break;
            }
        };

        match parse_command(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Say(text) => {
                session.set_text(text);
                dispatch(&mut session, &mut in_flight);
            }
            ReplCommand::Send => {
                if session.can_send() {
                    dispatch(&mut session, &mut in_flight);
                } else {
                    println!("Nothing to send: type a message or /attach a PDF.");
                }
            }
            ReplCommand::Attach(path) => {
                let path = expand_home(&path);
                println!("Uploading {}...", path.display());
                if let Ok(reference) = session.attach_file(&path).await {
                    debug!(pdf_path = %reference, "Attachment ready");
                }
            }
            ReplCommand::Detach => {
                session.detach();
                println!("Attachment cleared.");
            }
            ReplCommand::Mode(mode) => {
                session.select_mode(mode);
                match mode {
                    Some(mode) => println!("Mode: {}", mode.label()),
                    None => println!("Mode cleared."),
                }
            }
            ReplCommand::Suggest(None) => render::suggestions(),
            ReplCommand::Suggest(Some(index)) => match session.choose_suggestion(index) {
                Ok(tile) => println!("Loaded: {}  (/send to send it)", tile.prompt),
                Err(e) => println!("{}", e),
            },
            ReplCommand::History => {
                for message in session.messages() {
                    render::print_message(&message);
                }
                let waiting = session.pending_replies();
                if waiting > 0 {
                    println!("({} repl{} pending)", waiting, if waiting == 1 { "y" } else { "ies" });
                }
            }
            ReplCommand::Notices => {
                let active = session.notices();
                if active.is_empty() {
                    println!("No active notices.");
                }
                render::print_notices(&active);
            }
            ReplCommand::Dismiss(id) => {
                if !session.dismiss_notice(id) {
                    println!("No notice #{}", id);
                }
            }
            ReplCommand::Session => println!("{}", session.session_id()),
            ReplCommand::Help => render::help(),
            ReplCommand::Quit => break,
            ReplCommand::Invalid(reason) => println!("{}", reason),
        }

        in_flight.retain(|handle| !handle.is_finished());
    }

    if !in_flight.is_empty() {
        println!("Waiting for {} pending repl{}...", in_flight.len(), if in_flight.len() == 1 { "y" } else { "ies" });
    }
    join_all(in_flight).await;
    render::print_notices(&session.new_notices());
    Ok(())
}

/// Next line without its terminator; `None` at EOF. Bytes that are not
/// UTF-8 are replaced rather than rejected.
async fn read_line_lossy<R>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    let line = String::from_utf8_lossy(buf);
    let line = line.strip_suffix('\n').unwrap_or(&line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    Ok(Some(line.to_string()))
}

fn dispatch(session: &mut ChatSession, in_flight: &mut Vec<JoinHandle<()>>) {
    let Some(pending) = session.begin_send() else {
        return;
    };
    let dispatcher = session.dispatcher().clone();
    let notices = session.notice_board();

    in_flight.push(tokio::spawn(async move {
        match dispatcher.complete(pending).await {
            Ok(reply) => render::print_message(&reply),
            Err(_) => render::print_notices(&notices.lock().drain_new()),
        }
    }));
}

fn expand_home(path: &Path) -> std::path::PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir().map(|home| home.join(rest)).unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

/// `ragchat ask`: optional upload, one send, print the reply
pub async fn run_ask(
    mut session: ChatSession,
    text: String,
    pdf: Option<&Path>,
    mode: Option<ResponseMode>,
) -> ChatResult<()> {
    if let Some(pdf) = pdf {
        session.attach_file(&expand_home(pdf)).await?;
    }
    if mode.is_some() {
        session.select_mode(mode);
    }
    session.set_text(text);

    match session.send().await? {
        Some(reply) => {
            println!("{}", reply.content);
            Ok(())
        }
        None => Err(ChatError::Send("nothing to send: empty message and no PDF".into())),
    }
}

/// `ragchat upload`: print the backend reference for a PDF
pub async fn run_upload(mut session: ChatSession, file: &Path) -> ChatResult<()> {
    let reference = session.attach_file(&expand_home(file)).await?;
    println!("{}", reference);
    Ok(())
}

/// `ragchat session [--reset]`
pub fn run_session(storage: &dyn LocalStorage, reset: bool) -> ChatResult<()> {
    if reset {
        reset_session(storage)?;
        println!("Session id cleared; the next chat starts a new session.");
        return Ok(());
    }
    match storage.get(SESSION_KEY)? {
        Some(id) => println!("{}", id),
        None => println!("No session yet."),
    }
    Ok(())
}
