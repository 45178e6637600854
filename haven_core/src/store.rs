//! Key-value persistence for journal data.
//!
//! Values are arbitrary JSON documents addressed by a string key. The file
//! backend keeps one `<key>.json` per key and uses file locking plus atomic
//! rename so concurrent CLI invocations never observe a half-written value.

use crate::{Error, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Well-known storage keys
pub mod keys {
    pub const MOOD_LOGS: &str = "mood_logs";
    pub const TECHNIQUE_USAGE: &str = "technique_usage";
    pub const SAFETY_PLAN: &str = "safety_plan";
    pub const USER_PREFERENCES: &str = "user_preferences";
    pub const CONVERSATION_HISTORY: &str = "conversation_history";
    pub const MEDICATION_REMINDERS: &str = "medication_reminders";

    pub const ALL: &[&str] = &[
        MOOD_LOGS,
        TECHNIQUE_USAGE,
        SAFETY_PLAN,
        USER_PREFERENCES,
        CONVERSATION_HISTORY,
        MEDICATION_REMINDERS,
    ];
}

/// Get/set/remove of JSON values by key
pub trait KeyValueStore {
    /// Returns `None` when nothing is stored under `key`
    fn get_raw(&self, key: &str) -> Result<Option<Value>>;
    fn set_raw(&mut self, key: &str, value: &Value) -> Result<()>;
    /// Removing a missing key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Typed helpers available on every [`KeyValueStore`]
pub trait KeyValueStoreExt: KeyValueStore {
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_raw(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.set_raw(key, &value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

// ============================================================================
// File Store
// ============================================================================

/// Directory-backed store, one JSON file per key
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

/// Keys become file names, so only `[A-Za-z0-9_-]` is accepted
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::Store("empty key".into()));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(Error::Store(format!("invalid key '{}'", key)));
    }
    Ok(())
}

impl KeyValueStore for JsonFileStore {
    /// A file that cannot be parsed logs a warning and reads as missing.
    fn get_raw(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            tracing::debug!("No value stored for key '{}'", key);
            return Ok(None);
        }

        let file = File::open(&path)?;

        // Acquire shared lock for reading
        file.lock_shared()?;

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            return Err(Error::Io(e));
        }

        file.unlock()?;

        match serde_json::from_str::<Value>(&contents) {
            Ok(value) => {
                tracing::debug!("Loaded key '{}' from {:?}", key, path);
                Ok(Some(value))
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse stored value {:?}: {}. Treating as missing.",
                    path,
                    e
                );
                Ok(None)
            }
        }
    }

    /// Atomically writes the value by:
    /// 1. Writing to a temp file in the store directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    fn set_raw(&mut self, key: &str, value: &Value) -> Result<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        let temp = NamedTempFile::new_in(&self.dir)?;

        // Held until the contents are synced
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(value)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved key '{}' to {:?}", key, path);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!("Removed key '{}'", key);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

// ============================================================================
// Memory Store
// ============================================================================

/// In-memory store; nothing survives the process
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.get(key).cloned())
    }

    fn set_raw(&mut self, key: &str, value: &Value) -> Result<()> {
        self.values.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path().join("store"));

        store
            .set(keys::USER_PREFERENCES, &json!({ "dark_mode": true }))
            .unwrap();

        let loaded: Option<Value> = store.get(keys::USER_PREFERENCES).unwrap();
        assert_eq!(loaded, Some(json!({ "dark_mode": true })));
    }

    #[test]
    fn test_load_missing_returns_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(temp_dir.path());

        assert!(store.get_raw(keys::MOOD_LOGS).unwrap().is_none());
    }

    #[test]
    fn test_corrupted_value_reads_as_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("mood_logs.json"), "{ invalid json }").unwrap();

        let store = JsonFileStore::new(temp_dir.path());
        assert!(store.get_raw(keys::MOOD_LOGS).unwrap().is_none());
    }

    #[test]
    fn test_remove() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path());

        store.set(keys::SAFETY_PLAN, &json!({})).unwrap();
        store.remove(keys::SAFETY_PLAN).unwrap();
        assert!(store.get_raw(keys::SAFETY_PLAN).unwrap().is_none());

        // Removing again is fine
        store.remove(keys::SAFETY_PLAN).unwrap();
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path());

        assert!(matches!(
            store.set_raw("../escape", &json!(1)),
            Err(Error::Store(_))
        ));
        assert!(matches!(store.get_raw(""), Err(Error::Store(_))));
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path());

        store.set(keys::MOOD_LOGS, &json!([1, 2, 3])).unwrap();
        store.set(keys::MOOD_LOGS, &json!([4])).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "mood_logs.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only mood_logs.json, found extras: {:?}",
            extras
        );
        assert_eq!(store.get_raw(keys::MOOD_LOGS).unwrap(), Some(json!([4])));
    }

    #[test]
    fn test_typed_get_mismatch_is_error() {
        let mut store = MemoryStore::new();
        store.set(keys::MOOD_LOGS, &json!("not a list")).unwrap();

        let result: Result<Option<Vec<u8>>> = store.get(keys::MOOD_LOGS);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_memory_store_through_trait_object() {
        let mut store = MemoryStore::new();
        let dyn_store: &mut dyn KeyValueStore = &mut store;

        dyn_store.set("count", &3u32).unwrap();
        let count: Option<u32> = dyn_store.get("count").unwrap();
        assert_eq!(count, Some(3));
    }
}
