use bizbalance_core::storage::{load_or_default, StateStorage, STATE_KEY};
use bizbalance_domain::{AccountType, BankAccount, BusinessData, FinancialRecord};
use bizbalance_storage_json::{JsonStateStorage, StoragePaths};
use std::fs;
use tempfile::tempdir;

fn sample_state() -> BusinessData {
    BusinessData {
        accounts_receivable: vec![FinancialRecord::with_values("r1", "Acme invoice", 1250.5)],
        accounts_payable: vec![FinancialRecord::with_values("p1", "Rent", 900.0)],
        credit_cards: vec![FinancialRecord::with_values("c1", "Visa", -12.75)],
        bank_accounts: vec![BankAccount::with_values(
            "b1",
            "Operating",
            "Chase",
            AccountType::Checking,
            4000.0,
        )],
    }
}

#[test]
fn json_storage_round_trips_state() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonStateStorage::new(StoragePaths::under(dir.path())).expect("create storage");

    storage.save_state(STATE_KEY, &sample_state()).expect("save state");
    let loaded = storage.load_state(STATE_KEY).expect("load state");

    assert_eq!(loaded, Some(sample_state()));
    let path = storage.state_path(STATE_KEY);
    assert_eq!(
        path.file_name().and_then(|name| name.to_str()),
        Some("bizbalance_data.json")
    );
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn json_storage_writes_browser_field_names() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonStateStorage::new(StoragePaths::under(dir.path())).expect("create storage");
    storage.save_state(STATE_KEY, &sample_state()).expect("save state");

    let raw = fs::read_to_string(storage.state_path(STATE_KEY)).expect("read file");
    assert!(raw.contains("\"accountsReceivable\""));
    assert!(raw.contains("\"bankName\": \"Chase\""));
    assert!(raw.contains("\"type\": \"Checking\""));
}

#[test]
fn missing_state_loads_as_none_and_defaults() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonStateStorage::new(StoragePaths::under(dir.path())).expect("create storage");

    assert!(storage.load_state(STATE_KEY).expect("load").is_none());
    assert_eq!(
        load_or_default(&storage, STATE_KEY),
        BusinessData::default_state()
    );
}

#[test]
fn corrupt_state_falls_back_to_defaults() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonStateStorage::new(StoragePaths::under(dir.path())).expect("create storage");
    fs::write(storage.state_path(STATE_KEY), "{ not json").expect("write corrupt file");

    assert!(storage.load_state(STATE_KEY).is_err());
    assert_eq!(
        load_or_default(&storage, STATE_KEY),
        BusinessData::default_state()
    );
}

#[test]
fn overwriting_state_creates_restorable_backup() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonStateStorage::new(StoragePaths::under(dir.path())).expect("create storage");

    storage.save_state(STATE_KEY, &sample_state()).expect("first save");
    assert!(storage.list_backups(STATE_KEY).expect("list").is_empty());

    storage
        .save_state(STATE_KEY, &BusinessData::default_state())
        .expect("second save");
    let backups = storage.list_backups(STATE_KEY).expect("list backups");
    assert_eq!(backups.len(), 1);

    let restored = storage
        .restore_backup(STATE_KEY, &backups[0])
        .expect("restore backup");
    assert_eq!(restored, sample_state());
    assert_eq!(storage.load_state(STATE_KEY).expect("load"), Some(sample_state()));
}

#[test]
fn backups_are_pruned_to_retention() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::under(dir.path());
    let storage = JsonStateStorage::with_retention(paths.clone(), 2).expect("create storage");

    let backup_dir = paths.backup_root.join("bizbalance_data");
    fs::create_dir_all(&backup_dir).expect("backup dir");
    for stamp in ["20240101_000000", "20240102_000000", "20240103_000000"] {
        fs::write(
            backup_dir.join(format!("bizbalance_data_{stamp}.json")),
            "{}",
        )
        .expect("seed backup");
    }

    storage.save_state(STATE_KEY, &sample_state()).expect("first save");
    storage.save_state(STATE_KEY, &sample_state()).expect("second save");

    let backups = storage.list_backups(STATE_KEY).expect("list backups");
    assert_eq!(backups.len(), 2);
    assert!(backups
        .iter()
        .all(|info| !info.id.contains("20240101") && !info.id.contains("20240102")));
}

#[test]
fn restoring_missing_backup_fails() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonStateStorage::new(StoragePaths::under(dir.path())).expect("create storage");
    let bogus = bizbalance_core::storage::StateBackupInfo {
        id: "gone.json".into(),
        created_at: "unknown".into(),
        path: dir.path().join("gone.json"),
    };
    assert!(storage.restore_backup(STATE_KEY, &bogus).is_err());
}

#[test]
fn restoring_backup_keeps_replaced_state_recoverable() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::under(dir.path());
    let storage = JsonStateStorage::new(paths.clone()).expect("create storage");

    storage.save_state(STATE_KEY, &sample_state()).expect("save sample");
    let backup_dir = paths.backup_root.join("bizbalance_data");
    fs::create_dir_all(&backup_dir).expect("backup dir");
    fs::copy(
        storage.state_path(STATE_KEY),
        backup_dir.join("bizbalance_data_20240101_000000.json"),
    )
    .expect("seed backup");
    storage
        .save_state(STATE_KEY, &BusinessData::default_state())
        .expect("save defaults");

    let seeded = storage
        .list_backups(STATE_KEY)
        .expect("list backups")
        .into_iter()
        .find(|info| info.id.contains("20240101"))
        .expect("seeded backup listed");
    let restored = storage.restore_backup(STATE_KEY, &seeded).expect("restore");
    assert_eq!(restored, sample_state());

    let newest = storage
        .list_backups(STATE_KEY)
        .expect("list backups")
        .into_iter()
        .next()
        .expect("replaced state backed up");
    assert_eq!(
        storage.restore_backup(STATE_KEY, &newest).expect("undo restore"),
        BusinessData::default_state()
    );
}
