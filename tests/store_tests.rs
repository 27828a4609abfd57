// Integration tests for the preference store backends

use anyhow::Result;
use siteconsent::consent::{ConsentManager, ConsentOptions, LoadOutcome};
use siteconsent::models::{Category, ConsentPreferences, CONSENT_KEY};
use siteconsent::signal::SignalBus;
use siteconsent::store::{FileStore, PreferenceStore, SqliteStore};
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Decide in one "page load", then check a fresh mount sees the same record
fn decide_then_reload<S, F>(open: F) -> Result<()>
where
    S: PreferenceStore,
    F: Fn() -> Result<S>,
{
    let bus = SignalBus::new();
    let t0 = Instant::now();

    let mut first = ConsentManager::mount(open()?, &bus, ConsentOptions::default(), t0);
    assert_eq!(first.load_outcome(), LoadOutcome::Missing);
    first.tick(t0 + Duration::from_secs(1));
    first.open_settings();
    first.toggle(Category::Functional);
    first.toggle(Category::Marketing);
    let saved = first.save_selection()?;
    drop(first.unmount());

    let second = ConsentManager::mount(open()?, &bus, ConsentOptions::default(), t0);
    assert_eq!(second.load_outcome(), LoadOutcome::Loaded);
    assert_eq!(second.preferences(), saved);
    assert_eq!(second.preferences(), ConsentPreferences::new(true, false, true));
    assert!(!second.is_display_pending());

    Ok(())
}

#[test]
fn test_file_store_survives_reload() -> Result<()> {
    let temp = TempDir::new()?;
    let dir = temp.path().join("prefs");
    decide_then_reload(|| Ok(FileStore::open(&dir)?))
}

#[test]
fn test_sqlite_store_survives_reload() -> Result<()> {
    let temp = TempDir::new()?;
    let db = temp.path().join("consent.db");
    decide_then_reload(|| Ok(SqliteStore::open(&db)?))
}

#[test]
fn test_file_store_corrupt_record() -> Result<()> {
    let temp = TempDir::new()?;
    std::fs::write(temp.path().join("cookie-consent.json"), "[1, 2, 3]")?;

    let bus = SignalBus::new();
    let manager = ConsentManager::mount(
        FileStore::open(temp.path())?,
        &bus,
        ConsentOptions::default(),
        Instant::now(),
    );

    assert_eq!(manager.load_outcome(), LoadOutcome::Corrupt);
    assert_eq!(manager.preferences(), ConsentPreferences::default());
    Ok(())
}

#[test]
fn test_sqlite_records_update_time() -> Result<()> {
    let mut store = SqliteStore::open_in_memory()?;
    store.write(CONSENT_KEY, &ConsentPreferences::all().to_json())?;

    assert!(store.updated_at(CONSENT_KEY)?.is_some());
    let raw = store.read(CONSENT_KEY)?.unwrap_or_default();
    assert_eq!(ConsentPreferences::from_json(&raw)?, ConsentPreferences::all());
    Ok(())
}
