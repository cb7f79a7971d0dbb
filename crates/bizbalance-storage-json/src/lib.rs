use std::{
    cmp::Reverse,
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use bizbalance_core::{
    storage::{StateBackupInfo, StateStorage},
    CoreError,
};
use bizbalance_domain::BusinessData;
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, info};

const STATE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Directory layout used by [`JsonStateStorage`].
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub state_root: PathBuf,
    pub backup_root: PathBuf,
}

impl StoragePaths {
    /// `<base>/state` and `<base>/backups`.
    pub fn under(base: &Path) -> Self {
        Self {
            state_root: base.join("state"),
            backup_root: base.join("backups"),
        }
    }
}

/// Filesystem-backed JSON persistence for the dashboard state and its backups.
#[derive(Clone)]
pub struct JsonStateStorage {
    state_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStateStorage {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.state_root)?;
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            state_dir: paths.state_root,
            backups_dir: paths.backup_root,
            retention: retention.max(1),
        })
    }

    pub fn state_path(&self, key: &str) -> PathBuf {
        self.state_dir
            .join(format!("{}.{}", canonical_name(key), STATE_EXTENSION))
    }

    pub fn backup_path(&self, key: &str, backup: &str) -> PathBuf {
        self.backup_dir(key).join(backup)
    }

    fn backup_dir(&self, key: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(key))
    }

    fn backup_existing_file(&self, key: &str, path: &Path) -> Result<(), CoreError> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(key);
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let file_name = format!("{}_{}.{}", canonical_name(key), timestamp, STATE_EXTENSION);
        let backup_path = dir.join(&file_name);
        fs::copy(path, &backup_path)?;
        debug!(backup = %backup_path.display(), "backed up previous state");
        self.prune_backups(key)?;
        Ok(())
    }

    fn prune_backups(&self, key: &str) -> Result<(), CoreError> {
        let entries = self.list_backups(key)?;
        for entry in entries.into_iter().skip(self.retention) {
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl StateStorage for JsonStateStorage {
    fn load_state(&self, key: &str) -> Result<Option<BusinessData>, CoreError> {
        let path = self.state_path(key);
        match fs::read_to_string(&path) {
            Ok(data) => parse_state(&data).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save_state(&self, key: &str, data: &BusinessData) -> Result<(), CoreError> {
        let path = self.state_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if path.exists() {
            self.backup_existing_file(key, &path)?;
        }
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &serialize_state(data)?)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), "saved dashboard state");
        Ok(())
    }

    fn list_backups(&self, key: &str) -> Result<Vec<StateBackupInfo>, CoreError> {
        let dir = self.backup_dir(key);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(STATE_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                let created_at = parse_backup_timestamp(file_name)
                    .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "unknown".into());
                entries.push(StateBackupInfo {
                    id: file_name.to_string(),
                    created_at,
                    path: path.clone(),
                });
            }
        }
        entries.sort_by(|a, b| {
            Reverse(parse_backup_timestamp(&a.id))
                .cmp(&Reverse(parse_backup_timestamp(&b.id)))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }

    fn restore_backup(
        &self,
        key: &str,
        backup: &StateBackupInfo,
    ) -> Result<BusinessData, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        // Read first: backing up the live state may prune the chosen backup.
        let raw = fs::read_to_string(&backup.path)?;
        let data = parse_state(&raw)?;
        let target = self.state_path(key);
        self.backup_existing_file(key, &target)?;
        let tmp = tmp_path(&target);
        write_atomic(&tmp, &raw)?;
        fs::rename(&tmp, &target)?;
        info!(backup = %backup.id, "restored dashboard state from backup");
        Ok(data)
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "state".into()
    } else {
        sanitized
    }
}

/// Extracts the `YYYYMMDD_HHMMSS` suffix of a backup file name.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", STATE_EXTENSION))?;
    let mut segments = trimmed.rsplit('_');
    let time = segments.next()?;
    let date = segments.next()?;
    if !is_digits(date, 8) || !is_digits(time, 6) {
        return None;
    }
    let raw = format!("{}{}", date, time);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

fn parse_state(data: &str) -> Result<BusinessData, CoreError> {
    serde_json::from_str(data).map_err(|err| CoreError::Serde(err.to_string()))
}

fn serialize_state(data: &BusinessData) -> Result<String, CoreError> {
    serde_json::to_string_pretty(data).map_err(|err| CoreError::Serde(err.to_string()))
}
