//! File-backed local store.
//!
//! Keeps every key in one JSON object on disk, the desktop counterpart of
//! browser local storage.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use top100_core::error::{Result, Top100Error};
use top100_core::local_store::KeyValueStore;

/// [`KeyValueStore`] persisted as a JSON object in a single file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store, loading existing entries if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Local store opened");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| Top100Error::local_store("file store lock poisoned"))
    }

    /// Apply `f` to a copy of the entries and keep it only once it is on disk.
    fn commit<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> Result<()>,
    {
        let mut entries = self.lock()?;
        let mut next = entries.clone();
        f(&mut next)?;
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    /// Write to a sibling temp file, then rename over the original.
    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        self.commit(|entries| {
            entries.insert(key.to_string(), value);
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.commit(|entries| {
            entries.remove(key);
            Ok(())
        })
    }

    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Result<Option<String>>,
    ) -> Result<()> {
        self.commit(|entries| {
            match f(entries.get(key).cloned())? {
                Some(value) => entries.insert(key.to_string(), value),
                None => entries.remove(key),
            };
            Ok(())
        })
    }
}
