//! Key-value preference storage.
//!
//! The only persisted state is the theme preference. It lives in a flat TOML
//! table so it stays human-editable.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

/// Persistent string key-value storage.
pub trait PreferenceStore {
    /// Read a value. Missing keys and unreadable storage both yield `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store, used by tests and when no state file can be located.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.values.insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a TOML file.
///
/// The file is read on every `get` and rewritten on every `set`, so edits
/// made by another process (e.g. `datepick theme set`) are picked up.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default XDG state location.
    ///
    /// 1. `$XDG_STATE_HOME/datepick/state.toml`
    /// 2. `~/.local/state/datepick/state.toml`
    ///
    /// Returns `None` when neither variable is set.
    pub fn at_default_location() -> Option<Self> {
        Self::default_path().map(Self::new)
    }

    pub fn default_path() -> Option<PathBuf> {
        if let Ok(state_home) = env::var("XDG_STATE_HOME")
            && !state_home.is_empty()
        {
            return Some(PathBuf::from(state_home).join("datepick/state.toml"));
        }
        env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".local/state/datepick/state.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<toml::Table> {
        if !self.path.exists() {
            return Ok(toml::Table::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_table() {
            Ok(table) => table.get(key).and_then(|v| v.as_str()).map(str::to_string),
            Err(e) => {
                debug!("Ignoring unreadable state file {:?}: {}", self.path, e);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // A corrupt state file is replaced rather than blocking the write.
        let mut table = self.read_table().unwrap_or_default();
        table.insert(key.to_string(), toml::Value::String(value.to_string()));

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string(&table)?)?;
        debug!("Wrote {}={} to {:?}", key, value, self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("theme"), None);
        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_file_store_missing_file_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state.toml"));
        assert_eq!(store.get("theme"), None);
    }

    #[test]
    fn test_file_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/state.toml");
        let mut store = FileStore::new(&path);
        store.set("theme", "light").unwrap();

        assert!(path.exists());
        assert_eq!(store.get("theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_file_store_preserves_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        std::fs::write(&path, "other = \"kept\"\n").unwrap();

        let mut store = FileStore::new(&path);
        store.set("theme", "dark").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("other = \"kept\""));
        assert!(content.contains("theme = \"dark\""));
    }

    #[test]
    fn test_file_store_corrupt_file_reads_none_and_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        let mut store = FileStore::new(&path);
        assert_eq!(store.get("theme"), None);
        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_file_store_non_string_value_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.toml");
        std::fs::write(&path, "theme = 1\n").unwrap();
        assert_eq!(FileStore::new(&path).get("theme"), None);
    }
}
