use derive_more::Display;

use crate::core::playback::PlaybackState;
use crate::core::Error;

/// The events published by the playback controller for the presentation layer.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum PlaybackEvent {
    /// The state of the playback has been changed.
    #[display("Playback state changed to {}", _0)]
    StateChanged(PlaybackState),
    /// The playlist has been replaced.
    #[display("Playlist has been changed")]
    PlaylistChanged,
    /// The highlighted entry has been changed, `None` when no entry is active.
    #[display("Active track changed to {:?}", _0)]
    ActiveTrackChanged(Option<usize>),
    /// An error which should be surfaced to the user.
    #[display("Playback error, {}", _0)]
    Error(Error),
}
