//! In-memory playlist editor.
//!
//! Holds the ordered list a user is building. The list is the source of truth
//! until a save completes; saving itself is done by the caller with
//! [`PlaylistEditor::snapshot`].

use crate::types::{AgreedTrack, CatalogTrack, CatalogTrackId, MAX_PLAYLIST_TRACKS};
use serde::{Deserialize, Serialize};

/// Size-derived state of the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorState {
    /// No tracks
    Empty,
    /// Between 1 and 99 tracks
    Editing,
    /// Exactly 100 tracks; further adds are ignored
    Full,
}

/// Ordered, deduplicated list of up to 100 tracks
#[derive(Debug, Clone, Default)]
pub struct PlaylistEditor {
    tracks: Vec<CatalogTrack>,
    imported: bool,
}

impl PlaylistEditor {
    /// Create an empty editor
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor from previously saved tracks.
    ///
    /// Duplicates are dropped (first occurrence wins) and the list is cut at
    /// the track limit.
    pub fn from_tracks(tracks: impl IntoIterator<Item = CatalogTrack>) -> Self {
        let mut editor = Self::new();
        for track in tracks {
            editor.add(track);
        }
        editor
    }

    pub fn state(&self) -> EditorState {
        match self.tracks.len() {
            0 => EditorState::Empty,
            n if n >= MAX_PLAYLIST_TRACKS => EditorState::Full,
            _ => EditorState::Editing,
        }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[CatalogTrack] {
        &self.tracks
    }

    pub fn contains(&self, id: &CatalogTrackId) -> bool {
        self.position(id).is_some()
    }

    /// Index of a track in the current order
    pub fn position(&self, id: &CatalogTrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    /// Append a track.
    ///
    /// Returns `false` without changing anything when the track is already
    /// present or the editor is full.
    pub fn add(&mut self, track: CatalogTrack) -> bool {
        if self.state() == EditorState::Full || self.contains(&track.id) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    /// Remove a track by id, returning it if it was present
    pub fn remove(&mut self, id: &CatalogTrackId) -> Option<CatalogTrack> {
        let index = self.position(id)?;
        Some(self.tracks.remove(index))
    }

    /// Move the track at `from` to `to`, shifting the tracks in between.
    ///
    /// Out-of-range or equal indices leave the list unchanged.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.tracks.len();
        if from == to || from >= len || to >= len {
            return false;
        }
        let track = self.tracks.remove(from);
        self.tracks.insert(to, track);
        true
    }

    /// Drag-end helper: move `active` to the slot currently held by `over`
    pub fn move_track(&mut self, active: &CatalogTrackId, over: &CatalogTrackId) -> bool {
        if active == over {
            return false;
        }
        match (self.position(active), self.position(over)) {
            (Some(from), Some(to)) => self.reorder(from, to),
            _ => false,
        }
    }

    /// One-shot hydration from the agreed-tracks cache.
    ///
    /// Stubs already in the list are skipped and the combined list is cut at
    /// the track limit. Only the first call per editor has any effect.
    /// Returns the number of tracks added.
    pub fn import_agreed(&mut self, agreed: &[AgreedTrack]) -> usize {
        if self.imported {
            return 0;
        }
        self.imported = true;

        let before = self.tracks.len();
        for stub in agreed {
            if self.state() == EditorState::Full {
                break;
            }
            self.add(CatalogTrack::from(stub.clone()));
        }
        self.tracks.len() - before
    }

    /// Whether the agreed-tracks import already ran
    pub fn has_imported(&self) -> bool {
        self.imported
    }

    /// Ordered copy of the list, as submitted on save
    pub fn snapshot(&self) -> Vec<CatalogTrack> {
        self.tracks.clone()
    }

    pub fn into_tracks(self) -> Vec<CatalogTrack> {
        self.tracks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str) -> CatalogTrack {
        CatalogTrack {
            id: CatalogTrackId::new(id),
            name: format!("Track {}", id),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            album_art: None,
            preview_url: None,
            uri: format!("spotify:track:{}", id),
        }
    }

    fn stub(id: &str) -> AgreedTrack {
        AgreedTrack {
            id: CatalogTrackId::new(id),
            name: format!("Track {}", id),
            artist: "Artist".to_string(),
            album_art: None,
        }
    }

    fn ids(editor: &PlaylistEditor) -> Vec<&str> {
        editor.tracks().iter().map(|t| t.id.as_str()).collect()
    }

    fn full_editor() -> PlaylistEditor {
        PlaylistEditor::from_tracks((0..MAX_PLAYLIST_TRACKS).map(|i| track(&i.to_string())))
    }

    #[test]
    fn state_follows_size() {
        let mut editor = PlaylistEditor::new();
        assert_eq!(editor.state(), EditorState::Empty);

        editor.add(track("a"));
        assert_eq!(editor.state(), EditorState::Editing);

        editor.remove(&CatalogTrackId::new("a"));
        assert_eq!(editor.state(), EditorState::Empty);

        let mut editor = full_editor();
        assert_eq!(editor.state(), EditorState::Full);
        editor.remove(&CatalogTrackId::new("0"));
        assert_eq!(editor.state(), EditorState::Editing);
    }

    #[test]
    fn adding_duplicate_is_a_noop() {
        let mut editor = PlaylistEditor::new();
        assert!(editor.add(track("a")));
        assert!(!editor.add(track("a")));
        assert_eq!(editor.len(), 1);
    }

    #[test]
    fn adding_to_full_editor_is_a_noop() {
        let mut editor = full_editor();
        assert!(!editor.add(track("extra")));
        assert_eq!(editor.len(), MAX_PLAYLIST_TRACKS);
        assert!(!editor.contains(&CatalogTrackId::new("extra")));
    }

    #[test]
    fn removing_absent_track_is_a_noop() {
        let mut editor = PlaylistEditor::from_tracks(vec![track("a"), track("b")]);
        assert!(editor.remove(&CatalogTrackId::new("zzz")).is_none());
        assert_eq!(editor.len(), 2);
    }

    #[test]
    fn removing_present_track_shrinks_by_one() {
        let mut editor = PlaylistEditor::from_tracks(vec![track("a"), track("b"), track("c")]);
        let removed = editor.remove(&CatalogTrackId::new("b")).unwrap();
        assert_eq!(removed.id.as_str(), "b");
        assert_eq!(ids(&editor), vec!["a", "c"]);
    }

    #[test]
    fn reorder_moves_one_element_and_keeps_others_in_order() {
        let mut editor =
            PlaylistEditor::from_tracks(["a", "b", "c", "d", "e"].into_iter().map(track));

        assert!(editor.reorder(0, 3));
        assert_eq!(ids(&editor), vec!["b", "c", "d", "a", "e"]);

        assert!(editor.reorder(4, 1));
        assert_eq!(ids(&editor), vec!["b", "e", "c", "d", "a"]);
    }

    #[test]
    fn reorder_preserves_contents() {
        let mut editor =
            PlaylistEditor::from_tracks(["a", "b", "c", "d"].into_iter().map(track));
        editor.reorder(3, 0);

        let mut sorted = ids(&editor);
        sorted.sort_unstable();
        assert_eq!(sorted, vec!["a", "b", "c", "d"]);
        assert_eq!(editor.state(), EditorState::Editing);
    }

    #[test]
    fn reorder_out_of_range_is_a_noop() {
        let mut editor = PlaylistEditor::from_tracks(vec![track("a"), track("b")]);
        assert!(!editor.reorder(0, 2));
        assert!(!editor.reorder(5, 0));
        assert!(!editor.reorder(1, 1));
        assert_eq!(ids(&editor), vec!["a", "b"]);
    }

    #[test]
    fn move_track_uses_target_slot() {
        let mut editor = PlaylistEditor::from_tracks(["a", "b", "c"].into_iter().map(track));
        assert!(editor.move_track(&CatalogTrackId::new("c"), &CatalogTrackId::new("a")));
        assert_eq!(ids(&editor), vec!["c", "a", "b"]);

        assert!(!editor.move_track(&CatalogTrackId::new("c"), &CatalogTrackId::new("missing")));
        assert!(!editor.move_track(&CatalogTrackId::new("a"), &CatalogTrackId::new("a")));
    }

    #[test]
    fn import_deduplicates_against_current_contents() {
        let mut editor = PlaylistEditor::from_tracks(vec![track("a"), track("b")]);
        let added = editor.import_agreed(&[stub("b"), stub("c"), stub("c")]);

        assert_eq!(added, 1);
        assert_eq!(ids(&editor), vec!["a", "b", "c"]);
    }

    #[test]
    fn import_never_exceeds_limit() {
        let mut editor =
            PlaylistEditor::from_tracks((0..95).map(|i| track(&format!("saved-{}", i))));
        let agreed: Vec<_> = (0..20).map(|i| stub(&format!("agreed-{}", i))).collect();

        let added = editor.import_agreed(&agreed);

        assert_eq!(added, 5);
        assert_eq!(editor.len(), MAX_PLAYLIST_TRACKS);
        assert_eq!(editor.state(), EditorState::Full);
        assert!(editor.contains(&CatalogTrackId::new("agreed-4")));
        assert!(!editor.contains(&CatalogTrackId::new("agreed-5")));
    }

    #[test]
    fn import_runs_once() {
        let mut editor = PlaylistEditor::new();
        assert_eq!(editor.import_agreed(&[stub("a")]), 1);
        assert!(editor.has_imported());
        assert_eq!(editor.import_agreed(&[stub("b")]), 0);
        assert_eq!(ids(&editor), vec!["a"]);
    }

    #[test]
    fn from_tracks_drops_duplicates_and_truncates() {
        let editor = PlaylistEditor::from_tracks(
            std::iter::once(track("dup"))
                .chain(std::iter::once(track("dup")))
                .chain((0..200).map(|i| track(&i.to_string()))),
        );
        assert_eq!(editor.len(), MAX_PLAYLIST_TRACKS);
        assert_eq!(editor.tracks()[0].id.as_str(), "dup");
        assert_eq!(editor.tracks()[1].id.as_str(), "0");
    }
}
