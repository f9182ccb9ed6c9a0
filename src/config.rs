// src/config.rs
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ChatError, ChatResult};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_NOTICE_TTL_SECS: u64 = 5;

/// What happens to the attachment reference once a message has been sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttachmentPolicy {
    /// The uploaded document keeps anchoring follow-up questions
    #[default]
    Keep,
    /// Every send consumes the attachment
    Clear,
}

impl FromStr for AttachmentPolicy {
    type Err = ChatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keep" => Ok(AttachmentPolicy::Keep),
            "clear" => Ok(AttachmentPolicy::Clear),
            other => Err(ChatError::Config(format!(
                "RAGCHAT_ATTACHMENT_POLICY must be keep or clear, got {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend_url: String,
    /// Overrides the platform data dir when set
    pub home: Option<PathBuf>,
    pub request_timeout: Option<Duration>,
    pub attachment_policy: AttachmentPolicy,
    pub notice_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            home: None,
            request_timeout: None,
            attachment_policy: AttachmentPolicy::Keep,
            notice_ttl: Duration::from_secs(DEFAULT_NOTICE_TTL_SECS),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> ChatResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> ChatResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("RAGCHAT_BACKEND_URL") {
            config.backend_url = url;
        }

        if let Some(home) = lookup("RAGCHAT_HOME") {
            config.home = Some(PathBuf::from(home));
        }

        if let Some(secs) = lookup("RAGCHAT_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ChatError::Config(format!("RAGCHAT_REQUEST_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        if let Some(policy) = lookup("RAGCHAT_ATTACHMENT_POLICY") {
            config.attachment_policy = policy.parse()?;
        }

        if let Some(ttl) = lookup("RAGCHAT_NOTICE_TTL_SECS") {
            let secs: u64 = ttl.trim().parse().map_err(|_| {
                ChatError::Config(format!("RAGCHAT_NOTICE_TTL_SECS is not a number: {}", ttl))
            })?;
            config.notice_ttl = Duration::from_secs(secs);
        }

        config.set_backend_url(config.backend_url.clone())?;
        Ok(config)
    }

    /// Validate and normalise the backend base URL
    pub fn set_backend_url(&mut self, url: String) -> ChatResult<()> {
        let url = url.trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ChatError::Config(format!(
                "backend URL must start with http:// or https://, got {}",
                url
            )));
        }
        self.backend_url = url;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert!(config.request_timeout.is_none());
        assert_eq!(config.attachment_policy, AttachmentPolicy::Keep);
        assert_eq!(config.notice_ttl, Duration::from_secs(5));
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let config =
            ClientConfig::from_lookup(lookup(&[("RAGCHAT_BACKEND_URL", "https://rag.local:9000/")]))
                .unwrap();
        assert_eq!(config.backend_url, "https://rag.local:9000");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(ClientConfig::from_lookup(lookup(&[("RAGCHAT_BACKEND_URL", "localhost:8000")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[("RAGCHAT_REQUEST_TIMEOUT_SECS", "soon")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[("RAGCHAT_ATTACHMENT_POLICY", "maybe")])).is_err());
    }

    #[test]
    fn test_policy_and_timeout() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("RAGCHAT_ATTACHMENT_POLICY", "Clear"),
            ("RAGCHAT_REQUEST_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();
        assert_eq!(config.attachment_policy, AttachmentPolicy::Clear);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }
}
