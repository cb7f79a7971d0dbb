#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use assert_cmd::Command;
use bizbalance_config::{Config, ConfigManager};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated application home for one test.
pub fn test_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Script-mode shell rooted at `home`, with no insight credentials.
pub fn script_shell(home: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("bizbalance").expect("binary built");
    cmd.env("BIZBALANCE_CLI_SCRIPT", "1")
        .env("BIZBALANCE_HOME", home)
        .env_remove("API_KEY")
        .env_remove("GEMINI_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

pub fn write_config(home: &PathBuf, config: &Config) {
    let manager = ConfigManager::with_base_dir(home.clone()).expect("config manager");
    manager.save(config).expect("save config");
}

pub fn state_file(home: &PathBuf) -> PathBuf {
    home.join("state").join("bizbalance_data.json")
}
