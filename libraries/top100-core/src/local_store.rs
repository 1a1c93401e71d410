//! Browser-local key-value storage.
//!
//! [`KeyValueStore`] is the raw string store (in memory here, a JSON file in
//! the client crate). [`LocalCache`] layers the typed, versioned schema on
//! top and is what the editor and vote components get injected.

use crate::error::{Result, Top100Error};
use crate::types::{AgreedTrack, PlaylistId, TrackId, VoteValue};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Current local schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Keys used in the local store
pub mod keys {
    /// JSON array of agreed track stubs
    pub const AGREED_TRACKS: &str = "agreedTracks";
    /// JSON map `"<playlistId>-<trackId>"` -> vote
    pub const VOTES: &str = "votes";
    /// Schema version of the two keys above
    pub const SCHEMA_VERSION: &str = "schemaVersion";
    /// Stable anonymous visitor id
    pub const ANONYMOUS_ID: &str = "anonymousId";
}

/// Raw string key-value store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: String) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Replace the value under `key` with `f(current)` in one locked step.
    ///
    /// `Ok(None)` from `f` removes the key. An error from `f` leaves the
    /// store untouched.
    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Result<Option<String>>,
    ) -> Result<()>;
}

/// In-memory store, used by tests and short-lived sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with raw entries
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| Top100Error::local_store("memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn update(
        &self,
        key: &str,
        f: &mut dyn FnMut(Option<String>) -> Result<Option<String>>,
    ) -> Result<()> {
        let mut entries = self.lock()?;
        match f(entries.get(key).cloned())? {
            Some(value) => entries.insert(key.to_string(), value),
            None => entries.remove(key),
        };
        Ok(())
    }
}

/// Typed view over a [`KeyValueStore`] with a versioned schema
#[derive(Clone)]
pub struct LocalCache {
    store: Arc<dyn KeyValueStore>,
}

impl LocalCache {
    /// Open the cache, migrating older layouts to [`SCHEMA_VERSION`].
    ///
    /// Fails if the store was written by a newer schema.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let cache = Self { store };
        cache.migrate()?;
        Ok(cache)
    }

    /// Open a fresh in-memory cache
    pub fn in_memory() -> Result<Self> {
        Self::open(Arc::new(MemoryStore::new()))
    }

    pub fn schema_version(&self) -> Result<Option<u32>> {
        self.read(keys::SCHEMA_VERSION)
    }

    fn migrate(&self) -> Result<()> {
        match self.schema_version()? {
            Some(version) if version == SCHEMA_VERSION => Ok(()),
            Some(version) if version > SCHEMA_VERSION => Err(Top100Error::local_store(format!(
                "local store has schema version {}, newer than supported {}",
                version, SCHEMA_VERSION
            ))),
            // Unversioned stores hold the same two keys as v1; anything that
            // does not parse is discarded rather than blocking the visitor.
            _ => {
                if self.read::<Vec<AgreedTrack>>(keys::AGREED_TRACKS).is_err() {
                    tracing::warn!("Discarding unreadable agreed tracks during migration");
                    self.store.remove(keys::AGREED_TRACKS)?;
                }
                if self
                    .read::<BTreeMap<String, VoteValue>>(keys::VOTES)
                    .is_err()
                {
                    tracing::warn!("Discarding unreadable votes during migration");
                    self.store.remove(keys::VOTES)?;
                }
                self.store
                    .set(keys::SCHEMA_VERSION, SCHEMA_VERSION.to_string())?;
                tracing::debug!(version = SCHEMA_VERSION, "Local store migrated");
                Ok(())
            }
        }
    }

    /// Key under which a vote is mirrored locally
    pub fn vote_key(playlist_id: &PlaylistId, track_id: &TrackId) -> String {
        format!("{}-{}", playlist_id, track_id)
    }

    pub fn agreed_tracks(&self) -> Result<Vec<AgreedTrack>> {
        Ok(self.read(keys::AGREED_TRACKS)?.unwrap_or_default())
    }

    /// Append a stub unless one with the same id is already cached.
    ///
    /// Returns whether the stub was added.
    pub fn add_agreed_track(&self, track: AgreedTrack) -> Result<bool> {
        let mut added = false;
        self.modify(keys::AGREED_TRACKS, |tracks: &mut Vec<AgreedTrack>| {
            added = !tracks.iter().any(|t| t.id == track.id);
            if added {
                tracks.push(track.clone());
            }
        })?;
        Ok(added)
    }

    pub fn votes(&self) -> Result<BTreeMap<String, VoteValue>> {
        Ok(self.read(keys::VOTES)?.unwrap_or_default())
    }

    pub fn vote(&self, playlist_id: &PlaylistId, track_id: &TrackId) -> Result<Option<VoteValue>> {
        Ok(self
            .votes()?
            .get(&Self::vote_key(playlist_id, track_id))
            .copied())
    }

    pub fn record_vote(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
        value: VoteValue,
    ) -> Result<()> {
        let key = Self::vote_key(playlist_id, track_id);
        self.modify(keys::VOTES, |votes: &mut BTreeMap<String, VoteValue>| {
            votes.insert(key.clone(), value);
        })
    }

    /// Stable per-browser visitor id, created on first use
    pub fn anonymous_id(&self) -> Result<String> {
        let mut id = String::new();
        self.store.update(keys::ANONYMOUS_ID, &mut |current| {
            id = current.unwrap_or_else(|| Uuid::new_v4().to_string());
            Ok(Some(id.clone()))
        })?;
        Ok(id)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Read, change and write back a JSON value without another writer
    /// slipping in between.
    fn modify<T, F>(&self, key: &str, mut f: F) -> Result<()>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnMut(&mut T),
    {
        self.store.update(key, &mut |current| {
            let mut value = match current {
                Some(raw) => serde_json::from_str(&raw)?,
                None => T::default(),
            };
            f(&mut value);
            Ok(Some(serde_json::to_string(&value)?))
        })
    }
}
