use crate::core::playback::PlaybackState;
use crate::core::playlist::{Entry, PlaylistState};

/// The title shown when no entry is active.
pub const NO_TRACK_LOADED: &str = "No track loaded";

/// A point-in-time view of the playback controller, used by the presentation layer to render
/// the playlist and the currently playing track.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    /// The state of the playback.
    pub state: PlaybackState,
    /// The live playlist, including the selected index.
    pub playlist: PlaylistState,
    /// The index of the entry which is being played or has been paused.
    pub active_index: Option<usize>,
}

impl PlaybackSnapshot {
    pub fn entries(&self) -> &[Entry] {
        self.playlist.entries()
    }

    /// The selected index used for navigation.
    pub fn current_index(&self) -> Option<usize> {
        self.playlist.current_index()
    }

    /// Check if the entry at the given index should be highlighted.
    pub fn is_active(&self, index: usize) -> bool {
        self.active_index == Some(index)
    }

    /// The title of the active entry, if any.
    pub fn current_title(&self) -> Option<&str> {
        self.active_index
            .and_then(|e| self.playlist.get(e))
            .map(|e| e.title())
    }

    /// The title to display for the current track, [NO_TRACK_LOADED] when nothing is active.
    pub fn display_title(&self) -> &str {
        self.current_title().unwrap_or(NO_TRACK_LOADED)
    }
}
