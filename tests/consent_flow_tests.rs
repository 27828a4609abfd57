// Integration tests for the consent banner lifecycle
// Covers first visit, stored decisions, terminal actions and the reopen signal

use anyhow::Result;
use siteconsent::consent::{
    render, BannerView, ConsentManager, ConsentOptions, ConsentState, LoadOutcome,
};
use siteconsent::models::{Category, ConsentPreferences, CONSENT_KEY};
use siteconsent::signal::SignalBus;
use siteconsent::store::{MemoryStore, PreferenceStore};
use std::time::{Duration, Instant};

const DELAY: Duration = Duration::from_millis(1000);

fn mount(store: MemoryStore) -> (ConsentManager<MemoryStore>, SignalBus, Instant) {
    let bus = SignalBus::new();
    let t0 = Instant::now();
    let manager = ConsentManager::mount(store, &bus, ConsentOptions::default(), t0);
    (manager, bus, t0)
}

fn stored(manager: &ConsentManager<MemoryStore>) -> Result<ConsentPreferences> {
    let raw = manager
        .store()
        .get(CONSENT_KEY)
        .ok_or_else(|| anyhow::anyhow!("nothing stored"))?;
    Ok(ConsentPreferences::from_json(raw)?)
}

fn visible() -> ConsentState {
    ConsentState {
        banner_visible: true,
        settings_expanded: false,
    }
}

#[test]
fn test_banner_appears_after_delay_on_first_visit() {
    let (mut manager, _bus, t0) = mount(MemoryStore::new());

    assert_eq!(manager.load_outcome(), LoadOutcome::Missing);
    assert_eq!(manager.state(), ConsentState::default());

    manager.tick(t0 + DELAY - Duration::from_millis(1));
    assert!(!manager.state().banner_visible);

    manager.tick(t0 + DELAY);
    assert_eq!(manager.state(), visible());
    assert_eq!(manager.store().write_count(), 0);
}

#[test]
fn test_existing_consent_is_loaded_and_not_shown() {
    let record = ConsentPreferences::new(true, false, true);
    let (mut manager, _bus, t0) = mount(MemoryStore::with_value(CONSENT_KEY, &record.to_json()));

    assert_eq!(manager.load_outcome(), LoadOutcome::Loaded);
    assert_eq!(manager.preferences(), record);
    assert!(!manager.is_display_pending());

    manager.tick(t0 + DELAY);
    manager.tick(t0 + Duration::from_secs(3600));
    assert_eq!(render(&manager), BannerView::Hidden);
    assert_eq!(manager.store().write_count(), 0);
}

#[test]
fn test_accept_all_writes_once() -> Result<()> {
    let (mut manager, _bus, t0) = mount(MemoryStore::new());
    manager.tick(t0 + DELAY);

    let prefs = manager.accept_all()?;

    assert_eq!(prefs, ConsentPreferences::all());
    assert_eq!(stored(&manager)?, ConsentPreferences::all());
    assert_eq!(manager.store().write_count(), 1);
    assert_eq!(manager.state(), ConsentState::default());

    Ok(())
}

#[test]
fn test_reject_all_preserves_essential() -> Result<()> {
    let (mut manager, _bus, t0) = mount(MemoryStore::new());
    manager.tick(t0 + DELAY);
    manager.open_settings();

    manager.reject_all()?;

    let record = stored(&manager)?;
    assert!(record.essential());
    assert!(!record.functional());
    assert!(!record.statistics());
    assert!(!record.marketing());
    assert_eq!(manager.store().write_count(), 1);
    assert_eq!(manager.state(), ConsentState::default());

    Ok(())
}

#[test]
fn test_unsaved_toggle_does_not_leak_into_reject() -> Result<()> {
    let (mut manager, _bus, t0) = mount(MemoryStore::new());
    manager.tick(t0 + DELAY);
    manager.open_settings();

    assert!(manager.toggle(Category::Statistics));
    assert!(manager.draft().statistics());
    assert_eq!(manager.store().write_count(), 0);

    manager.reject_all()?;

    assert!(!stored(&manager)?.statistics());
    assert!(!manager.draft().statistics());
    Ok(())
}

#[test]
fn test_corrupt_record_falls_back_to_defaults() -> Result<()> {
    let (mut manager, _bus, t0) = mount(MemoryStore::with_value(CONSENT_KEY, "{not json"));

    assert_eq!(manager.load_outcome(), LoadOutcome::Corrupt);
    assert_eq!(manager.preferences(), ConsentPreferences::default());

    manager.tick(t0 + DELAY);
    assert_eq!(manager.store().write_count(), 0);
    assert_eq!(manager.store().get(CONSENT_KEY), Some("{not json"));

    manager.accept_all()?;
    assert_eq!(manager.store().write_count(), 1);
    assert_eq!(stored(&manager)?, ConsentPreferences::all());

    Ok(())
}

#[test]
fn test_reopen_after_dismissal_expands_settings() -> Result<()> {
    let (mut manager, bus, t0) = mount(MemoryStore::new());
    manager.tick(t0 + DELAY);
    manager.accept_all()?;
    assert!(!manager.state().banner_visible);

    assert_eq!(bus.emit(), 1);

    assert_eq!(
        manager.state(),
        ConsentState {
            banner_visible: true,
            settings_expanded: true
        }
    );
    assert_eq!(manager.store().write_count(), 1);
    Ok(())
}

#[test]
fn test_reopen_shows_stored_values_as_baseline() -> Result<()> {
    let record = ConsentPreferences::new(false, true, false);
    let (mut manager, bus, _t0) = mount(MemoryStore::with_value(CONSENT_KEY, &record.to_json()));

    bus.emit();

    let BannerView::Settings { rows, .. } = render(&manager) else {
        panic!("expected settings view after reopen");
    };
    for row in &rows {
        assert_eq!(row.checked, record.get(row.category), "{}", row.category);
    }
    assert!(rows.iter().any(|r| r.category == Category::Essential && !r.togglable));

    manager.toggle(Category::Marketing);
    let saved = manager.save_selection()?;
    assert_eq!(saved, ConsentPreferences::new(false, true, true));
    Ok(())
}

#[test]
fn test_reopen_before_delay_cancels_timer() {
    let (mut manager, bus, t0) = mount(MemoryStore::new());
    bus.emit();
    manager.close_settings();

    assert!(!manager.is_display_pending());
    assert!(!manager.tick(t0 + DELAY));
    assert_eq!(manager.state(), visible());
}

#[test]
fn test_teardown_detaches_listener() {
    let (manager, bus, _t0) = mount(MemoryStore::new());
    assert_eq!(bus.listener_count(), 1);

    let store = manager.unmount();

    assert_eq!(bus.listener_count(), 0);
    assert_eq!(bus.emit(), 0);
    assert_eq!(store.write_count(), 0);
}

#[test]
fn test_failed_write_keeps_banner_open() {
    struct ReadOnly;

    impl PreferenceStore for ReadOnly {
        fn read(&self, _key: &str) -> Result<Option<String>, siteconsent::store::StoreError> {
            Ok(None)
        }

        fn write(&mut self, key: &str, _value: &str) -> Result<(), siteconsent::store::StoreError> {
            Err(siteconsent::store::StoreError::InvalidKey(key.to_string()))
        }
    }

    let bus = SignalBus::new();
    let t0 = Instant::now();
    let mut manager = ConsentManager::mount(ReadOnly, &bus, ConsentOptions::default(), t0);
    manager.tick(t0 + DELAY);

    assert!(manager.accept_all().is_err());
    assert_eq!(manager.state(), visible());
    assert_eq!(manager.preferences(), ConsentPreferences::default());
}

#[test]
fn test_custom_delay() {
    let bus = SignalBus::new();
    let t0 = Instant::now();
    let options = ConsentOptions {
        display_delay: Duration::from_millis(50),
        ..ConsentOptions::default()
    };
    let mut manager = ConsentManager::mount(MemoryStore::new(), &bus, options, t0);

    assert!(manager.tick(t0 + Duration::from_millis(50)));
}
