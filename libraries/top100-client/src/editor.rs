//! Editing session for the signed-in user's playlist.

use crate::client::Top100Client;
use crate::error::Result;
use crate::types::SavePlaylistResponse;
use top100_core::editor::PlaylistEditor;
use top100_core::local_store::LocalCache;
use top100_core::types::CatalogTrack;
use tracing::info;

/// A [`PlaylistEditor`] bound to the server and the local cache.
pub struct EditorSession {
    client: Top100Client,
    editor: PlaylistEditor,
    title: Option<String>,
}

impl EditorSession {
    /// Start editing from the saved playlist.
    ///
    /// With `import` set, agreed tracks from the local cache are appended
    /// once. The cache itself is left untouched.
    pub async fn open(client: Top100Client, cache: &LocalCache, import: bool) -> Result<Self> {
        let saved = client.my_playlist().await?;

        let (title, mut editor) = match saved {
            Some(playlist) => (
                Some(playlist.playlist.title),
                PlaylistEditor::from_tracks(
                    playlist
                        .tracks
                        .into_iter()
                        .map(|entry| CatalogTrack::from(entry.track)),
                ),
            ),
            None => (None, PlaylistEditor::new()),
        };

        if import {
            let agreed = cache.agreed_tracks()?;
            let added = editor.import_agreed(&agreed);
            info!(added, total = editor.len(), "Imported agreed tracks");
        }

        Ok(Self {
            client,
            editor,
            title,
        })
    }

    pub fn editor(&self) -> &PlaylistEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut PlaylistEditor {
        &mut self.editor
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Submit the current order. The in-memory list stays as is either way.
    pub async fn save(&self) -> Result<SavePlaylistResponse> {
        let tracks = self.editor.snapshot();
        self.client
            .save_playlist(self.title.as_deref(), &tracks)
            .await
    }
}
