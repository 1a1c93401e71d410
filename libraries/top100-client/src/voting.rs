//! Voting on someone else's playlist.

use crate::client::Top100Client;
use crate::error::{ClientError, Result};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use top100_core::affinity::{AffinityTracker, AgreedTracksUpdated, LocalVote};
use top100_core::types::{PlaylistId, Track, TrackId, VoteValue};
use tracing::{debug, warn};

/// A vote applied locally whose server submission may still be running.
pub struct PendingVote {
    pub local: LocalVote,
    /// Resolves once the server answered. Failures are already logged.
    pub submission: JoinHandle<std::result::Result<(), ClientError>>,
}

/// Votes on one playlist: local state first, server second.
pub struct VotingSession {
    client: Top100Client,
    tracker: Arc<AffinityTracker>,
    playlist_id: PlaylistId,
}

impl VotingSession {
    pub fn new(client: Top100Client, tracker: Arc<AffinityTracker>, playlist_id: PlaylistId) -> Self {
        Self {
            client,
            tracker,
            playlist_id,
        }
    }

    pub fn playlist_id(&self) -> &PlaylistId {
        &self.playlist_id
    }

    /// Vote to highlight for a track when the playlist is shown
    pub fn current_vote(&self, track_id: &TrackId) -> Result<Option<VoteValue>> {
        Ok(self.tracker.current_vote(&self.playlist_id, track_id)?)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AgreedTracksUpdated> {
        self.tracker.subscribe()
    }

    /// Record the vote locally, then submit it in the background.
    ///
    /// The local result is final: a failed submission is logged and the
    /// local vote is kept. Must be called inside a tokio runtime.
    pub fn vote(&self, track: &Track, value: VoteValue) -> Result<PendingVote> {
        let local = self.tracker.record(&self.playlist_id, track, value)?;
        let visitor_id = self.tracker.cache().anonymous_id()?;

        let client = self.client.clone();
        let playlist_id = self.playlist_id.clone();
        let track_id = track.id.clone();

        let submission = tokio::spawn(async move {
            match client
                .cast_vote(&playlist_id, &track_id, value, Some(visitor_id.as_str()))
                .await
            {
                Ok(receipt) => {
                    debug!(track_id = %receipt.track_id, vote = %receipt.vote, "Vote submitted");
                    Ok(())
                }
                Err(e) => {
                    warn!(
                        playlist_id = %playlist_id,
                        track_id = %track_id,
                        error = %e,
                        "Vote submission failed"
                    );
                    Err(e)
                }
            }
        });

        Ok(PendingVote { local, submission })
    }
}
