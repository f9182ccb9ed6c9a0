// src/path_manager.rs
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Failed to create directory: {0}")]
    CreateDirFailed(String),
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),
}

/// Layout of the client home directory (`RAGCHAT_HOME`)
#[derive(Debug, Clone)]
pub struct PathManager {
    base_dir: PathBuf,
    logs_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self, PathError> {
        Self::with_base(Self::get_base_dir()?)
    }

    pub fn with_base(base_dir: PathBuf) -> Result<Self, PathError> {
        let logs_dir = base_dir.join("logs");

        Self::ensure_dir(&base_dir)?;
        Self::ensure_dir(&logs_dir)?;

        Ok(Self { base_dir, logs_dir })
    }

    fn get_base_dir() -> Result<PathBuf, PathError> {
        match env::var("RAGCHAT_HOME") {
            Ok(path) => Ok(PathBuf::from(path)),
            Err(_) => dirs::data_local_dir()
                .ok_or_else(|| PathError::EnvVarNotSet("RAGCHAT_HOME or platform data dir".into()))
                .map(|p| p.join("ragchat")),
        }
    }

    fn ensure_dir(path: &Path) -> Result<(), PathError> {
        if !path.exists() {
            std::fs::create_dir_all(path)
                .map_err(|e| PathError::CreateDirFailed(format!("{}: {}", path.display(), e)))?;
        }
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    /// Key/value file backing the client-local storage
    pub fn storage_path(&self) -> PathBuf {
        self.base_dir.join("storage.json")
    }
}
