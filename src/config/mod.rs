//! Configuration management for siteconsent
//!
//! Handles the ~/.siteconsent/ directory structure and config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::consent::{ConsentOptions, DEFAULT_DISPLAY_DELAY};
use crate::models::CONSENT_KEY;
use crate::store::{FileStore, PreferenceStore, SqliteStore};

/// Which store backend holds the consent record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    File,
    Sqlite,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::File => write!(f, "file"),
            StoreBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub banner: BannerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub legal: LegalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerConfig {
    pub display_delay_ms: u64,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            display_delay_ms: DEFAULT_DISPLAY_DELAY.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LegalConfig {
    pub privacy: PathBuf,
    pub imprint: PathBuf,
}

impl Default for LegalConfig {
    fn default() -> Self {
        Self {
            privacy: PathBuf::from("legal/privacy.md"),
            imprint: PathBuf::from("legal/imprint.md"),
        }
    }
}

impl Config {
    pub fn consent_options(&self) -> ConsentOptions {
        ConsentOptions {
            display_delay: Duration::from_millis(self.banner.display_delay_ms),
            key: CONSENT_KEY.to_string(),
        }
    }
}

/// Returns the path to the siteconsent home directory (~/.siteconsent)
pub fn siteconsent_home() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".siteconsent"))
}

/// Returns paths to all siteconsent files and directories
pub struct SitePaths {
    pub root: PathBuf,
    pub config: PathBuf,
    pub prefs: PathBuf,
    pub db_file: PathBuf,
    pub legal: PathBuf,
    pub log_file: PathBuf,
}

impl SitePaths {
    pub fn new() -> Result<Self> {
        Ok(Self::at(siteconsent_home()?))
    }

    /// Layout rooted at an arbitrary directory
    pub fn at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config: root.join("config.toml"),
            prefs: root.join("prefs"),
            db_file: root.join("consent.db"),
            legal: root.join("legal"),
            log_file: root.join("siteconsent.log"),
            root,
        }
    }

    /// Create all directories if they don't exist
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.root).context("Failed to create siteconsent root")?;
        fs::create_dir_all(&self.prefs).context("Failed to create prefs directory")?;
        fs::create_dir_all(&self.legal).context("Failed to create legal directory")?;
        Ok(())
    }

    /// Check if siteconsent has been initialized
    pub fn is_initialized(&self) -> bool {
        self.config.exists()
    }

    /// Resolve a configured path against the root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Open the configured preference store
    pub fn open_store(&self, config: &Config) -> Result<Box<dyn PreferenceStore>> {
        let store: Box<dyn PreferenceStore> = match config.store.backend {
            StoreBackend::File => {
                Box::new(FileStore::open(&self.prefs).context("Failed to open file store")?)
            }
            StoreBackend::Sqlite => {
                Box::new(SqliteStore::open(&self.db_file).context("Failed to open sqlite store")?)
            }
        };
        Ok(store)
    }
}

/// Load configuration from disk, falling back to defaults when absent
pub fn load_config(paths: &SitePaths) -> Result<Config> {
    if !paths.config.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&paths.config).context("Failed to read config.toml")?;
    toml::from_str(&content).context("Failed to parse config.toml")
}

/// Save configuration to disk
pub fn save_config(paths: &SitePaths, config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(&paths.config, content).context("Failed to write config.toml")?;
    Ok(())
}
