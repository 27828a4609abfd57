//! CLI commands for siteconsent

use anyhow::{bail, Context, Result};
use std::fs;
use std::time::Instant;

use crate::config::{load_config, save_config, Config, SitePaths};
use crate::consent::{ConsentManager, LoadOutcome};
use crate::models::{Category, ConsentPreferences};
use crate::signal::SignalBus;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Summary,
}

/// Terminal decision applied without the interactive banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    AcceptAll,
    RejectAll,
}

const SAMPLE_PRIVACY: &str = "# Privacy Policy\n\n\
This site stores a single preference record in your browser to remember your cookie choice.\n\
Optional categories are only enabled after you consent to them.\n";

const SAMPLE_IMPRINT: &str = "# Imprint\n\n\
Replace this file with the operator's legal contact details.\n";

/// Initialize siteconsent for first-time setup
pub fn init(paths: &SitePaths) -> Result<()> {
    if paths.is_initialized() {
        println!("siteconsent is already initialized at {}", paths.root.display());
        return Ok(());
    }

    println!("Initializing siteconsent at {}...", paths.root.display());

    paths.ensure_dirs()?;
    println!("  Created directory structure");

    let config = Config::default();
    save_config(paths, &config)?;
    println!("  Created config.toml");

    for (path, text) in [
        (paths.resolve(&config.legal.privacy), SAMPLE_PRIVACY),
        (paths.resolve(&config.legal.imprint), SAMPLE_IMPRINT),
    ] {
        if !path.exists() {
            fs::write(&path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("  Created {}", path.display());
        }
    }

    paths.open_store(&config)?;
    println!("  Opened {} store", config.store.backend);

    println!();
    println!("siteconsent initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  siteconsent tui       Open the page with the consent banner");
    println!("  siteconsent show      Show the stored decision");

    Ok(())
}

/// Print the stored consent decision
pub fn show(paths: &SitePaths, format: OutputFormat) -> Result<()> {
    ensure_initialized(paths)?;
    let config = load_config(paths)?;
    let store = paths.open_store(&config)?;

    let bus = SignalBus::new();
    let manager = ConsentManager::mount(store, &bus, config.consent_options(), Instant::now());
    let prefs = manager.preferences();

    match (format, manager.load_outcome()) {
        (OutputFormat::Json, LoadOutcome::Loaded) => {
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        }
        (OutputFormat::Json, _) => println!("null"),
        (OutputFormat::Summary, LoadOutcome::Missing) => {
            println!("No consent decision stored.");
        }
        (OutputFormat::Summary, LoadOutcome::Corrupt) => {
            println!("Stored consent decision is unreadable; defaults apply until the next decision.");
        }
        (OutputFormat::Summary, LoadOutcome::Loaded) => print_summary(&prefs),
    }

    Ok(())
}

/// Apply accept-all or reject-all
pub fn decide(paths: &SitePaths, decision: Decision) -> Result<ConsentPreferences> {
    ensure_initialized(paths)?;
    let config = load_config(paths)?;
    let store = paths.open_store(&config)?;

    let bus = SignalBus::new();
    let mut manager = ConsentManager::mount(store, &bus, config.consent_options(), Instant::now());
    let prefs = match decision {
        Decision::AcceptAll => manager.accept_all(),
        Decision::RejectAll => manager.reject_all(),
    }
    .context("Failed to save consent decision")?;

    println!("✓ Consent decision saved");
    print_summary(&prefs);
    Ok(prefs)
}

fn print_summary(prefs: &ConsentPreferences) {
    for category in Category::ALL {
        let mark = if prefs.get(category) { "✓" } else { "✗" };
        println!("  {} {:<12}", mark, category.to_string());
    }
}

fn ensure_initialized(paths: &SitePaths) -> Result<()> {
    if !paths.is_initialized() {
        bail!("siteconsent is not initialized. Run: siteconsent init");
    }
    Ok(())
}
