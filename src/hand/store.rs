//! Key-value persistence for hand preferences.
//!
//! Values are scoped per installation, not per process, so the JSON file
//! store is the default for real hosts. The in-memory store serves tests and
//! hosts that keep preferences elsewhere.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A persistence port for string preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Errors that can occur while persisting preferences.
#[derive(Debug)]
pub enum StoreError {
    IoError(String),
    SerializeError(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::IoError(e) => write!(f, "IO error: {e}"),
            StoreError::SerializeError(e) => write!(f, "Serialize error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Preferences held in memory for the lifetime of the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// On-disk format of the preference file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedPreferences {
    values: BTreeMap<String, String>,
}

/// Preferences persisted as a JSON file, rewritten on every change.
#[derive(Debug)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFilePreferenceStore {
    /// Open the store at `path`, loading any existing values.
    ///
    /// A missing or unreadable file starts an empty store.
    pub fn open(path: PathBuf) -> Self {
        let mut store = Self {
            path,
            values: BTreeMap::new(),
        };

        if let Err(e) = store.load() {
            tracing::warn!("Could not load preferences from {:?}: {}", store.path, e);
        }

        store
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn load(&mut self) -> Result<(), std::io::Error> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let persisted: PersistedPreferences =
                serde_json::from_str(&content).map_err(std::io::Error::other)?;
            self.values = persisted.values;
        }
        Ok(())
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::IoError(e.to_string()))?;
        }

        let persisted = PersistedPreferences {
            values: self.values.clone(),
        };
        let json = serde_json::to_string_pretty(&persisted)
            .map_err(|e| StoreError::SerializeError(e.to_string()))?;

        std::fs::write(&self.path, json).map_err(|e| StoreError::IoError(e.to_string()))
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }
}
