use derive_more::Display;

/// The state of the playback controller.
#[derive(Debug, Display, Default, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackState {
    /// No playlist entries are available.
    #[default]
    Empty,
    /// Entries are available, but nothing is being played.
    Stopped,
    /// The engine has been asked to play an entry, the outcome is still pending.
    Loading,
    Playing,
    Paused,
}
