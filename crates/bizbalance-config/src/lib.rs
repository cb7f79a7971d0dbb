//! bizbalance-config
//!
//! Persistent user preferences for the dashboard shell.
//! Owns the Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{ConfigBackup, ConfigManager, DEFAULT_BACKUP_RETENTION};
pub use model::Config;
