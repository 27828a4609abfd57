//! Key-value persistence for consent decisions
//!
//! The consent manager only needs synchronous `read`/`write` of a single
//! string value. Backends: in-memory, one JSON file per key, or SQLite.

pub mod file;
pub mod sqlite;

use std::collections::HashMap;

pub use file::FileStore;
pub use sqlite::SqliteStore;

/// Storage failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid store key: {0:?}")]
    InvalidKey(String),
}

/// Synchronous key-value storage used by the consent manager
pub trait PreferenceStore {
    /// Raw stored value, or `None` if the key is absent
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the stored value for `key`
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value)
    }
}

/// Volatile store; counts writes so callers can check persistence behaviour
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one value
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value.to_string());
        Self {
            values,
            writes: 0,
        }
    }

    /// Number of `write` calls since construction
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl PreferenceStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.writes += 1;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
