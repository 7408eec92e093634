use peerlink_core::SessionError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown command: {0} (try /help)")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Discovery failed: {0}")]
    DiscoveryFailed(String),

    #[error("Timed out waiting for {0}")]
    Timeout(&'static str),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

impl CliError {
    pub fn config_not_found(path: PathBuf) -> Self {
        CliError::ConfigNotFound { path }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
