// Integration tests for the non-interactive CLI commands

use anyhow::Result;
use siteconsent::commands::{self, Decision, OutputFormat};
use siteconsent::config::{load_config, save_config, SitePaths, StoreBackend};
use siteconsent::models::{ConsentPreferences, CONSENT_KEY};
use siteconsent::modal::Disclosure;
use siteconsent::store::PreferenceStore;
use tempfile::TempDir;

fn setup() -> Result<(TempDir, SitePaths)> {
    let temp_dir = TempDir::new()?;
    let paths = SitePaths::at(temp_dir.path().join("site"));
    commands::init(&paths)?;
    Ok((temp_dir, paths))
}

#[test]
fn test_init_creates_layout() -> Result<()> {
    let (_temp, paths) = setup()?;

    assert!(paths.is_initialized());
    assert!(paths.prefs.is_dir());

    let config = load_config(&paths)?;
    let privacy = Disclosure::load(&paths.resolve(&config.legal.privacy))?;
    assert_eq!(privacy.title.as_deref(), Some("Privacy Policy"));
    assert!(!privacy.is_empty());

    // second init is a no-op
    commands::init(&paths)?;
    Ok(())
}

#[test]
fn test_commands_require_init() {
    let temp = TempDir::new().unwrap();
    let paths = SitePaths::at(temp.path());
    let err = commands::show(&paths, OutputFormat::Summary).unwrap_err();
    assert!(err.to_string().contains("not initialized"));
}

#[test]
fn test_reject_then_accept() -> Result<()> {
    let (_temp, paths) = setup()?;

    let rejected = commands::decide(&paths, Decision::RejectAll)?;
    assert_eq!(rejected, ConsentPreferences::essential_only());

    let accepted = commands::decide(&paths, Decision::AcceptAll)?;
    assert_eq!(accepted, ConsentPreferences::all());

    let config = load_config(&paths)?;
    let store = paths.open_store(&config)?;
    let raw = store.read(CONSENT_KEY)?.unwrap_or_default();
    assert_eq!(ConsentPreferences::from_json(&raw)?, ConsentPreferences::all());

    commands::show(&paths, OutputFormat::Json)?;
    Ok(())
}

#[test]
fn test_sqlite_backend_from_config() -> Result<()> {
    let (_temp, paths) = setup()?;
    let mut config = load_config(&paths)?;
    config.store.backend = StoreBackend::Sqlite;
    save_config(&paths, &config)?;

    commands::decide(&paths, Decision::AcceptAll)?;

    assert!(paths.db_file.exists());
    assert!(!paths.prefs.join("cookie-consent.json").exists());
    commands::show(&paths, OutputFormat::Summary)?;
    Ok(())
}
