mod ids;
mod playlist;
mod track;
mod user;
mod vote;

pub use ids::{CatalogTrackId, PlaylistId, TrackId, UserId};
pub use playlist::{
    Playlist, PlaylistEntry, PlaylistOwner, PlaylistSummary, PublicPlaylist, SavePlaylist,
    SavedPlaylist, DEFAULT_PLAYLIST_TITLE, MAX_PLAYLIST_TRACKS,
};
pub use track::{AgreedTrack, CatalogTrack, Track, UpsertTrack};
pub use user::{UpsertUser, User};
pub use vote::{CastVote, Vote, VoteValue, Voter, ANONYMOUS_VOTER};
