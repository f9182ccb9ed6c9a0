//! Logging configuration
//!
//! Loads from environment variables:
//! - RUST_LOG: Tracing level (debug, info, warn, error)
//! - LOG_FORMAT: File output format (json or text)
//! - LOG_DIR: Directory for log files (default: $RAGCHAT_HOME/logs)
//! - LOG_CONSOLE: Mirror logs to stderr (default: false, keeps the REPL clean)
//! - LOG_FILE: Write daily-rolling log files (default: true)

use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level (debug, info, warn, error)
    pub log_level: String,

    /// Log format for the file layer
    pub log_format: LogFormat,

    /// Directory for log files
    pub log_dir: PathBuf,

    pub enable_file_logging: bool,
    pub enable_console_logging: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    pub fn as_str(&self) -> &str {
        match self {
            LogFormat::Json => "json",
            LogFormat::Text => "text",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" => Ok(LogFormat::Text),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogConfig {
    pub fn new(log_dir: &Path) -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            log_dir: log_dir.to_path_buf(),
            enable_file_logging: true,
            enable_console_logging: false,
        }
    }

    /// Load configuration from environment variables, falling back to `default_log_dir`
    pub fn from_env(default_log_dir: &Path) -> Self {
        let mut config = Self::new(default_log_dir);

        if let Ok(log_level) = std::env::var("RUST_LOG") {
            config.log_level = log_level;
        }

        if let Ok(log_format) = std::env::var("LOG_FORMAT") {
            if let Ok(format) = log_format.parse() {
                config.log_format = format;
            }
        }

        if let Ok(log_dir) = std::env::var("LOG_DIR") {
            config.log_dir = PathBuf::from(log_dir);
        }

        if let Ok(console) = std::env::var("LOG_CONSOLE") {
            config.enable_console_logging = console.to_lowercase() == "true";
        }

        if let Ok(file) = std::env::var("LOG_FILE") {
            config.enable_file_logging = file.to_lowercase() != "false";
        }

        config
    }

    pub fn ensure_log_dir(&self) -> std::io::Result<()> {
        if !self.log_dir.exists() {
            std::fs::create_dir_all(&self.log_dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::new(Path::new("/tmp/ragchat-logs"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.enable_file_logging);
        assert!(!config.enable_console_logging);
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("invalid".parse::<LogFormat>().is_err());
    }
}
