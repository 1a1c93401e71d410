//! Top 100 Core
//!
//! Platform-agnostic types, traits, and client-side state for Top 100: a
//! ranked list of up to 100 tracks that others can vote on.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `CatalogTrack`, `Track`, `Playlist`, `Vote`, `User`
//! - **Storage Trait**: `StorageContext`, implemented by `top100-storage`
//! - **Editor**: `PlaylistEditor`, the in-memory list being built
//! - **Local Store**: `KeyValueStore` and the versioned `LocalCache`
//! - **Affinity**: `AffinityTracker`, local vote mirroring and agreed tracks
//! - **Error Handling**: Unified `Top100Error` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use top100_core::editor::{EditorState, PlaylistEditor};
//! use top100_core::types::{CatalogTrack, CatalogTrackId};
//!
//! let mut editor = PlaylistEditor::new();
//! editor.add(CatalogTrack {
//!     id: CatalogTrackId::new("4uLU6hMCjMI75M1A2tKUQC"),
//!     name: "Never Gonna Give You Up".into(),
//!     artist: "Rick Astley".into(),
//!     album: "Whenever You Need Somebody".into(),
//!     album_art: None,
//!     preview_url: None,
//!     uri: "spotify:track:4uLU6hMCjMI75M1A2tKUQC".into(),
//! });
//! assert_eq!(editor.state(), EditorState::Editing);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod affinity;
pub mod editor;
pub mod error;
pub mod local_store;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use affinity::{AffinityTracker, AgreedTracksUpdated, LocalVote};
pub use editor::{EditorState, PlaylistEditor};
pub use error::{Result, Top100Error};
pub use local_store::{KeyValueStore, LocalCache, MemoryStore};
pub use storage::StorageContext;

pub use types::{
    AgreedTrack, CastVote, CatalogTrack, CatalogTrackId, Playlist, PlaylistEntry, PlaylistId,
    PlaylistOwner, PlaylistSummary, PublicPlaylist, SavePlaylist, SavedPlaylist, Track, TrackId,
    UpsertTrack, UpsertUser, User, UserId, Vote, VoteValue, Voter, MAX_PLAYLIST_TRACKS,
};
