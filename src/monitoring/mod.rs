//! Monitoring module for ragchat
//!
//! Provides:
//! - Structured logging with tracing
//! - Log directory and format configuration
//!
//! Creates $RAGCHAT_HOME/logs/ on first run when file logging is enabled.

pub mod config;
pub mod tracing_config;

pub use config::{LogConfig, LogFormat};
pub use tracing_config::init_tracing;
