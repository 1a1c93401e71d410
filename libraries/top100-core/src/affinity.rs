//! Local side of vote recording.
//!
//! Mirrors each vote into the [`LocalCache`] immediately and keeps the
//! agreed-tracks collection that seeds a visitor's own list. Listeners learn
//! about new agreed tracks through a broadcast channel.

use crate::error::Result;
use crate::local_store::LocalCache;
use crate::types::{AgreedTrack, PlaylistId, Track, TrackId, VoteValue};
use tokio::sync::broadcast;

const UPDATE_CHANNEL_CAPACITY: usize = 16;

/// Published whenever a new track lands in the agreed-tracks cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgreedTracksUpdated {
    /// Size of the cache after the update
    pub count: usize,
}

/// Outcome of recording a vote locally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalVote {
    pub value: VoteValue,
    /// Whether this vote added a new agreed track
    pub newly_agreed: bool,
    pub agreed_count: usize,
}

/// Records votes locally and tracks agreed tracks
pub struct AffinityTracker {
    cache: LocalCache,
    updates: broadcast::Sender<AgreedTracksUpdated>,
}

impl AffinityTracker {
    pub fn new(cache: LocalCache) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self { cache, updates }
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    /// Receive a notification each time the agreed-tracks count grows
    pub fn subscribe(&self) -> broadcast::Receiver<AgreedTracksUpdated> {
        self.updates.subscribe()
    }

    /// Vote shown for a track when the page loads
    pub fn current_vote(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
    ) -> Result<Option<VoteValue>> {
        self.cache.vote(playlist_id, track_id)
    }

    pub fn agreed_tracks(&self) -> Result<Vec<AgreedTrack>> {
        self.cache.agreed_tracks()
    }

    pub fn agreed_count(&self) -> Result<usize> {
        Ok(self.cache.agreed_tracks()?.len())
    }

    /// Mirror a vote locally.
    ///
    /// An agreeing vote also adds the track to the agreed cache; the update
    /// notification fires only when the track was not cached yet. Disagreeing
    /// later does not remove a cached track.
    pub fn record(
        &self,
        playlist_id: &PlaylistId,
        track: &Track,
        value: VoteValue,
    ) -> Result<LocalVote> {
        self.cache.record_vote(playlist_id, &track.id, value)?;

        let newly_agreed = match value {
            VoteValue::Agree => self.cache.add_agreed_track(AgreedTrack::from(track))?,
            VoteValue::Disagree => false,
        };
        let agreed_count = self.agreed_count()?;

        if newly_agreed {
            // No receivers is fine; nobody is showing the count yet.
            let _ = self.updates.send(AgreedTracksUpdated {
                count: agreed_count,
            });
            tracing::debug!(track = %track.catalog_id, count = agreed_count, "Track agreed");
        }

        Ok(LocalVote {
            value,
            newly_agreed,
            agreed_count,
        })
    }
}
