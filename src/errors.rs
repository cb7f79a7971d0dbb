use bizbalance_config::ConfigError;
use bizbalance_core::{CoreError, InsightError};
use thiserror::Error;

/// Unifies failures from the workspace crates at the application layer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Insight(#[from] InsightError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Backup #{0} does not exist")]
    BackupNotFound(usize),
}
