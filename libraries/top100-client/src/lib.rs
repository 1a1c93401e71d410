//! Top 100 Client
//!
//! HTTP client and local state for the Top 100 API.
//!
//! # Features
//!
//! - **API**: search, save and load playlists, vote, refresh the session
//! - **Editing**: [`EditorSession`] resumes the saved list and imports agreed tracks
//! - **Voting**: [`VotingSession`] records votes locally and submits them in the background
//! - **Local store**: [`JsonFileStore`] persists the local cache to disk
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use top100_client::{ClientConfig, EditorSession, JsonFileStore, Top100Client};
//! use top100_core::LocalCache;
//!
//! let client = Top100Client::new(ClientConfig::with_session("https://top100.example.com", token))?;
//! let cache = LocalCache::open(Arc::new(JsonFileStore::open("local.json")?))?;
//!
//! let mut session = EditorSession::open(client.clone(), &cache, true).await?;
//! for track in client.search("bohemian rhapsody").await? {
//!     session.editor_mut().add(track);
//! }
//! session.save().await?;
//! ```

mod client;
mod editor;
mod error;
mod store;
mod types;
mod voting;

pub use client::Top100Client;
pub use editor::EditorSession;
pub use error::{ClientError, Result};
pub use store::JsonFileStore;
pub use types::{
    CastVoteRequest, ClientConfig, HealthResponse, SavePlaylistRequest, SavePlaylistResponse,
    SessionResponse, VoteReceipt,
};
pub use voting::{PendingVote, VotingSession};
