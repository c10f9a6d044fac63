//! Settings store behaviour with in-memory collaborators

use chain_journal::application::{JournalService, SettingsStore};
use chain_journal::domain::settings::{DEFAULT_NEW_FILE_LOCATION, DEFAULT_TEMPLATE};
use chain_journal::domain::{SettingKey, SettingValue, Settings};
use chain_journal::error::ChainError;
use chain_journal::infrastructure::{
    DailyNotesOptions, MemoryPersistence, MemoryVault, RecordingHost,
};
use chrono::NaiveDate;
use serde_json::json;

async fn load(persistence: MemoryPersistence) -> SettingsStore<MemoryPersistence, RecordingHost> {
    SettingsStore::load(persistence, RecordingHost::new()).await
}

fn text(value: &str) -> SettingValue {
    SettingValue::Text(value.to_string())
}

#[tokio::test]
async fn test_persisted_values_merge_over_defaults() {
    let store = load(MemoryPersistence::with_data(json!({
        "dateFormat": "DD.MM.YYYY",
        "somethingFromAnOlderVersion": 3
    })))
    .await;

    assert_eq!(store.settings().date_format, "DD.MM.YYYY");
    assert_eq!(store.settings().journal_folder, "Journal");
    assert_eq!(store.settings().default_template, DEFAULT_TEMPLATE);
}

#[tokio::test]
async fn test_corrupt_payload_is_replaced_by_defaults() {
    for corrupt in [json!("not an object"), json!({ "journalFolder": 42 })] {
        let store = load(MemoryPersistence::with_data(corrupt)).await;

        assert_eq!(store.settings(), &Settings::default());
        assert_eq!(
            store.persistence().data(),
            Some(Settings::default().to_persisted())
        );
    }
}

#[tokio::test]
async fn test_unchanged_value_skips_persistence_and_host() {
    let mut store = load(MemoryPersistence::new()).await;
    let saves_after_load = store.persistence().save_count();

    let changed = store
        .set(SettingKey::DateFormat, text("YYYY-MM-DD dddd"))
        .await
        .unwrap();

    assert!(!changed);
    assert_eq!(store.persistence().save_count(), saves_after_load);
    assert!(store.host().syncs().is_empty());
}

#[tokio::test]
async fn test_set_persists_immediately() {
    let mut store = load(MemoryPersistence::new()).await;

    store
        .set(SettingKey::JournalFolder, text("Diary"))
        .await
        .unwrap();

    assert_eq!(store.persistence().data().unwrap()["journalFolder"], "Diary");
    assert_eq!(store.get(SettingKey::JournalFolder), text("Diary"));
}

#[tokio::test]
async fn test_only_daily_note_keys_sync_host() {
    let mut store = load(MemoryPersistence::new()).await;

    store
        .set(SettingKey::JournalFolder, text("Diary"))
        .await
        .unwrap();
    store
        .set(SettingKey::DefaultTemplate, text("# {date}"))
        .await
        .unwrap();
    store
        .set(SettingKey::OpenDailyNoteOnStartup, SettingValue::Flag(false))
        .await
        .unwrap();
    assert!(store.host().syncs().is_empty());

    store
        .set(SettingKey::DateFormat, text("YYYY-MM-DD"))
        .await
        .unwrap();
    store
        .set(SettingKey::NewFileLocation, text(""))
        .await
        .unwrap();
    store
        .set(SettingKey::TemplateFileLocation, text("/T.md"))
        .await
        .unwrap();

    let syncs = store.host().syncs();
    assert_eq!(syncs.len(), 3);
    assert_eq!(
        syncs[2],
        DailyNotesOptions {
            format: "YYYY-MM-DD".to_string(),
            folder: DEFAULT_NEW_FILE_LOCATION.to_string(),
            template: "/T.md".to_string(),
        }
    );
}

#[tokio::test]
async fn test_failed_save_is_noticed_and_not_applied() {
    let mut store = load(MemoryPersistence::new().failing()).await;

    let err = store
        .set(SettingKey::DateFormat, text("YYYY-MM-DD"))
        .await
        .unwrap_err();

    assert!(matches!(err, ChainError::Persistence(_)));
    assert_eq!(store.settings().date_format, "YYYY-MM-DD dddd");
    assert!(store.host().syncs().is_empty());
    let notices = store.host().notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].contains("dateFormat"));
}

#[tokio::test]
async fn test_changed_settings_reach_next_entry() {
    let store = load(MemoryPersistence::new()).await;
    let mut service = JournalService::new(store, MemoryVault::new());

    service
        .store_mut()
        .set_from_str("dailyNotesFolderOverride", "Inbox")
        .await
        .unwrap();
    let file = service
        .open_entry(NaiveDate::from_ymd_opt(2023, 5, 15).unwrap())
        .await
        .unwrap();

    assert_eq!(file.path, "Inbox/2023-05-15 Monday.md");
}
