use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{NaiveDateTime, Utc};

use crate::{Config, ConfigError};

/// Snapshots kept by default; older ones are pruned after each new snapshot.
pub const DEFAULT_BACKUP_RETENTION: usize = 5;

const BACKUP_PREFIX: &str = "config_";
const BACKUP_EXTENSION: &str = ".json";
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// A configuration snapshot on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigBackup {
    pub name: String,
    pub taken_at: Option<NaiveDateTime>,
}

impl ConfigBackup {
    fn from_file_name(name: &str) -> Option<Self> {
        let stamp = name
            .strip_prefix(BACKUP_PREFIX)?
            .strip_suffix(BACKUP_EXTENSION)?;
        Some(Self {
            name: name.to_string(),
            taken_at: NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).ok(),
        })
    }
}

/// Reads and writes [`Config`] and keeps a bounded set of snapshots beside it.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf, backups_dir: PathBuf) -> Self {
        Self {
            config_path,
            backups_dir,
            retention: DEFAULT_BACKUP_RETENTION,
        }
    }

    /// Lays files out as `<base>/config/config.json` and `<base>/config/backups/`.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let config_dir = base.join("config");
        let backups_dir = config_dir.join("backups");
        fs::create_dir_all(&backups_dir)?;
        Ok(Self::new(config_dir.join("config.json"), backups_dir))
    }

    /// Keeps at most `retention` snapshots (never fewer than one).
    pub fn with_retention(mut self, retention: usize) -> Self {
        self.retention = retention.max(1);
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// A missing file yields [`Config::default`].
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }
        decode(&fs::read_to_string(&self.config_path)?)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        replace_file(&self.config_path, &encode(config)?)
    }

    /// Writes a snapshot of `config`, prunes past the retention limit, and
    /// returns the snapshot's file name.
    pub fn backup(&self, config: &Config) -> Result<String, ConfigError> {
        let name = self.snapshot(&encode(config)?)?;
        self.prune()?;
        Ok(name)
    }

    /// Makes the named snapshot current. The config being replaced is
    /// snapshotted first so the restore can be undone.
    pub fn restore(&self, backup_name: &str) -> Result<Config, ConfigError> {
        let path = self.backups_dir.join(backup_name);
        if !path.is_file() {
            return Err(ConfigError::BackupNotFound(backup_name.to_string()));
        }
        let raw = fs::read_to_string(&path)?;
        let config = decode(&raw)?;
        if self.config_path.exists() {
            self.snapshot(&fs::read_to_string(&self.config_path)?)?;
            self.prune()?;
        }
        self.save(&config)?;
        Ok(config)
    }

    /// Snapshots newest first.
    pub fn backups(&self) -> Result<Vec<ConfigBackup>, ConfigError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut found = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(backup) = entry
                .file_name()
                .to_str()
                .and_then(ConfigBackup::from_file_name)
            {
                found.push(backup);
            }
        }
        found.sort_by(|a, b| {
            Reverse(a.taken_at)
                .cmp(&Reverse(b.taken_at))
                .then_with(|| b.name.cmp(&a.name))
        });
        Ok(found)
    }

    pub fn list_backups(&self) -> Result<Vec<String>, ConfigError> {
        Ok(self.backups()?.into_iter().map(|backup| backup.name).collect())
    }

    fn snapshot(&self, contents: &str) -> Result<String, ConfigError> {
        let name = format!(
            "{}{}{}",
            BACKUP_PREFIX,
            Utc::now().format(STAMP_FORMAT),
            BACKUP_EXTENSION
        );
        replace_file(&self.backups_dir.join(&name), contents)?;
        Ok(name)
    }

    fn prune(&self) -> Result<(), ConfigError> {
        for stale in self.backups()?.into_iter().skip(self.retention) {
            fs::remove_file(self.backups_dir.join(stale.name))?;
        }
        Ok(())
    }
}

fn decode(raw: &str) -> Result<Config, ConfigError> {
    serde_json::from_str(raw).map_err(|err| ConfigError::Serde(err.to_string()))
}

fn encode(config: &Config) -> Result<String, ConfigError> {
    serde_json::to_string_pretty(config).map_err(|err| ConfigError::Serde(err.to_string()))
}

/// Writes beside `path` and renames over it, so readers never see a partial file.
fn replace_file(path: &Path, contents: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);
    let mut file = File::create(&staging)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    fs::rename(&staging, path)?;
    Ok(())
}
