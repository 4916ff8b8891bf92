//! Durable integer preferences.
//!
//! The game only ever stores its high score, but it talks to storage through
//! [`PreferenceStore`] so tests can swap in [`MemoryStore`].

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub trait PreferenceStore: Send {
    fn get_int(&self, key: &str, default: i32) -> i32;
    /// Fire-and-forget: implementations log write failures instead of
    /// returning them.
    fn set_int(&mut self, key: &str, value: i32);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, i32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: i32) -> Self {
        let mut store = Self::new();
        store.values.insert(key.to_string(), value);
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_string(), value);
    }
}

/// A flat JSON object of integers, rewritten on every `set_int`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, i32>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable or malformed one is an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse preferences {:?}", path))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read preferences {:?}", path));
            }
        };
        debug!(?path, entries = values.len(), "opened preference store");
        Ok(Self { path, values })
    }

    /// Empty store bound to `path`; the file is created on first write.
    pub fn empty(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf(), values: BTreeMap::new() }
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(&self.values).context("Failed to serialize preferences")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write preferences to {:?}", self.path))
    }
}

impl PreferenceStore for JsonFileStore {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_string(), value);
        if let Err(e) = self.flush() {
            warn!("preference write dropped: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_defaults_and_overwrites() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_int("HighScore", 0), 0);
        store.set_int("HighScore", 4);
        store.set_int("HighScore", 9);
        assert_eq!(store.get_int("HighScore", 0), 9);
    }

    #[test]
    fn json_store_survives_reopen() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("prefs.json");

        let mut store = JsonFileStore::open(&path)?;
        assert_eq!(store.get_int("HighScore", 0), 0);
        store.set_int("HighScore", 12);

        let reopened = JsonFileStore::open(&path)?;
        assert_eq!(reopened.get_int("HighScore", 0), 12);
        assert_eq!(reopened.get_int("Other", -1), -1);
        Ok(())
    }

    #[test]
    fn json_store_rejects_garbage() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("prefs.json");
        fs::write(&path, "not json")?;
        assert!(JsonFileStore::open(&path).is_err());
        Ok(())
    }
}
