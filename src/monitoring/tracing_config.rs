//! Structured logging with tracing
//!
//! Sets up:
//! - Console logging to stderr (opt-in, the REPL owns stdout)
//! - File logging with daily rotation
//! - JSON or text file format

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::daily;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use super::config::{LogConfig, LogFormat};

/// Initialize the global tracing subscriber.
///
/// Returns the file writer guard when file logging is on. Keep it alive for
/// the duration of the program; dropping it stops file logging.
pub fn init_tracing(config: &LogConfig) -> std::io::Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let console_layer = config.enable_console_logging.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    });

    let mut guard = None;
    let file_layer = if config.enable_file_logging {
        config.ensure_log_dir()?;
        let (writer, file_guard) = tracing_appender::non_blocking(daily(&config.log_dir, "ragchat.log"));
        guard = Some(file_guard);

        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        Some(match config.log_format {
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Text => layer.boxed(),
        })
    } else {
        None
    };

    // A subscriber may already be installed (tests, embedding apps)
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_initialization() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig::new(dir.path());
        let guard = init_tracing(&config).unwrap();
        assert!(guard.is_some());
    }

    #[test]
    fn test_file_logging_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = LogConfig::new(dir.path());
        config.enable_file_logging = false;
        let guard = init_tracing(&config).unwrap();
        assert!(guard.is_none());
    }
}
