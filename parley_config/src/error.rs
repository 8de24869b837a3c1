use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Startup-time configuration failures. None of these are retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "{key} not found. For local development, add it to a .env file. \
         For deployment, add it to the secrets file at {}.",
        .secrets_file.display()
    )]
    MissingCredential { key: String, secrets_file: PathBuf },

    #[error("Cannot find home directory")]
    HomeDirNotFound,

    #[error("Config file already exists at: {}. Please edit it directly.", .0.display())]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}
