use std::path::PathBuf;

use bizbalance_domain::BusinessData;
use tracing::{info, warn};

use crate::CoreError;

/// Fixed key under which the dashboard state is stored.
pub const STATE_KEY: &str = "bizbalance_data";

/// Describes a persisted snapshot of an earlier state.
#[derive(Debug, Clone)]
pub struct StateBackupInfo {
    pub id: String,
    pub created_at: String,
    pub path: PathBuf,
}

/// Abstraction over backends able to keep one state blob plus its backups.
pub trait StateStorage: Send + Sync {
    /// Returns `Ok(None)` when nothing has been stored under `key` yet.
    fn load_state(&self, key: &str) -> Result<Option<BusinessData>, CoreError>;
    fn save_state(&self, key: &str, data: &BusinessData) -> Result<(), CoreError>;
    fn list_backups(&self, key: &str) -> Result<Vec<StateBackupInfo>, CoreError>;
    fn restore_backup(&self, key: &str, backup: &StateBackupInfo)
        -> Result<BusinessData, CoreError>;
}

/// Loads the stored state, falling back to [`BusinessData::default_state`]
/// when nothing is stored or the blob cannot be read.
pub fn load_or_default(storage: &dyn StateStorage, key: &str) -> BusinessData {
    match storage.load_state(key) {
        Ok(Some(data)) => {
            info!(key, records = data.record_count(), "loaded dashboard state");
            data
        }
        Ok(None) => {
            warn!(key, "no stored state, starting from defaults");
            BusinessData::default_state()
        }
        Err(err) => {
            warn!(key, error = %err, "stored state unreadable, starting from defaults");
            BusinessData::default_state()
        }
    }
}
