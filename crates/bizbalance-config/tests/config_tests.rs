use bizbalance_config::{Config, ConfigError, ConfigManager};
use bizbalance_domain::FormulaMode;
use std::fs;
use tempfile::tempdir;

#[test]
fn default_config_has_insight_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.currency, "USD");
    assert_eq!(cfg.default_formula, FormulaMode::Standard);
    assert_eq!(cfg.insight_model, "gemini-2.5-flash");
    assert_eq!(cfg.insight_timeout_secs, 30);
    assert!(cfg.insight_endpoint.is_none());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"), dir.path().join("backups"));

    let mut cfg = Config::default();
    cfg.set("default_formula", "strict").expect("set formula");
    cfg.set("insight_timeout_secs", "12").expect("set timeout");

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert_eq!(loaded.default_formula, FormulaMode::Strict);
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    assert_eq!(manager.load().expect("load"), Config::default());
    assert!(manager.config_path().ends_with("config/config.json"));
}

#[test]
fn partial_files_fill_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"locale":"en-GB","currency":"GBP"}"#).expect("write");
    let manager = ConfigManager::new(path, dir.path().join("backups"));

    let loaded = manager.load().expect("load");
    assert_eq!(loaded.currency, "GBP");
    assert_eq!(loaded.insight_model, "gemini-2.5-flash");
    assert!(loaded.ui_color_enabled);
}

#[test]
fn set_rejects_unknown_keys_and_bad_values() {
    let mut cfg = Config::default();
    assert!(matches!(cfg.set("theme", "dark"), Err(ConfigError::UnknownKey(_))));
    assert!(matches!(
        cfg.set("default_formula", "sideways"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        cfg.set("insight_timeout_secs", "0"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert_eq!(cfg, Config::default());
}

#[test]
fn empty_value_clears_optional_keys() {
    let mut cfg = Config::default();
    cfg.set("insight_endpoint", "http://localhost:9000").expect("set");
    assert_eq!(cfg.get("insight_endpoint").expect("get"), "http://localhost:9000");
    cfg.set("insight_endpoint", "").expect("clear");
    assert!(cfg.insight_endpoint.is_none());
}

#[test]
fn backups_can_be_listed_and_restored() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.set("currency", "eur").expect("set currency");
    let name = manager.backup(&cfg).expect("backup");

    let backups = manager.list_backups().expect("list");
    assert_eq!(backups, vec![name.clone()]);

    let restored = manager.restore(&name).expect("restore");
    assert_eq!(restored.currency, "EUR");
    assert_eq!(manager.load().expect("load").currency, "EUR");
    assert!(matches!(
        manager.restore("config_missing.json"),
        Err(ConfigError::BackupNotFound(_))
    ));
}

#[test]
fn backups_are_pruned_to_retention() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf())
        .expect("manager")
        .with_retention(2);
    let backups_dir = dir.path().join("config").join("backups");
    for stamp in ["20240101_000000", "20240102_000000", "20240103_000000"] {
        fs::write(backups_dir.join(format!("config_{stamp}.json")), "{}").expect("seed");
    }

    let newest = manager.backup(&Config::default()).expect("backup");

    let kept = manager.list_backups().expect("list");
    assert_eq!(kept, vec![newest, "config_20240103_000000.json".to_string()]);
    assert!(!backups_dir.join("config_20240101_000000.json").exists());
}

#[test]
fn restore_snapshots_the_replaced_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    let backups_dir = dir.path().join("config").join("backups");
    fs::write(
        backups_dir.join("config_20240101_000000.json"),
        r#"{"currency":"EUR"}"#,
    )
    .expect("seed");

    let mut current = Config::default();
    current.set("currency", "gbp").expect("set currency");
    manager.save(&current).expect("save");

    let restored = manager.restore("config_20240101_000000.json").expect("restore");
    assert_eq!(restored.currency, "EUR");

    let backups = manager.backups().expect("list");
    assert_eq!(backups.len(), 2);
    let undone = manager.restore(&backups[0].name).expect("undo");
    assert_eq!(undone.currency, "GBP");
}
