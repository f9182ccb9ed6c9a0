// ragchat/src/main.rs
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use std::sync::Arc;

use ragchat::api::HttpBackend;
use ragchat::cli::{repl, Cli, Commands};
use ragchat::config::ClientConfig;
use ragchat::monitoring::{init_tracing, LogConfig};
use ragchat::path_manager::PathManager;
use ragchat::session::{FileStorage, LocalStorage, MemoryStorage};
use ragchat::{ChatError, ChatResult, ChatSession};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e.user_notice());
            if matches!(e, ChatError::Config(_)) {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

async fn run(cli: Cli) -> ChatResult<()> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.backend {
        config.set_backend_url(url)?;
    }

    let pm = match &config.home {
        Some(home) => PathManager::with_base(home.clone()),
        None => PathManager::new(),
    }
    .map_err(|e| ChatError::Config(e.to_string()))?;

    // Held for the whole run; dropping it stops file logging
    let _log_guard = init_tracing(&LogConfig::from_env(pm.logs_dir()))?;

    let storage: Box<dyn LocalStorage> = if cli.ephemeral {
        Box::new(MemoryStorage::new())
    } else {
        Box::new(FileStorage::new(pm.storage_path()))
    };

    let command = cli.command.unwrap_or(Commands::Chat);
    if let Commands::Session { reset } = command {
        return repl::run_session(storage.as_ref(), reset);
    }

    let backend = Arc::new(HttpBackend::new(&config.backend_url, config.request_timeout)?);
    let session = ChatSession::new(&config, backend, storage.as_ref());

    match command {
        Commands::Chat => repl::run_repl(session, &config.backend_url).await,
        Commands::Ask { text, pdf, mode } => repl::run_ask(session, text, pdf.as_deref(), mode).await,
        Commands::Upload { file } => repl::run_upload(session, &file).await,
        Commands::Session { .. } => Ok(()),
    }
}
