use std::fmt::{Debug, Display};

use async_trait::async_trait;
use fx_callback::Callback;

use crate::core::players::PlaybackError;

/// The events published by a [PlaybackEngine].
#[derive(Debug, derive_more::Display, Clone, PartialEq)]
pub enum EngineEvent {
    /// The loaded source has been played until the end.
    /// It's published exactly once per completed source.
    #[display("Playback of the loaded source has ended")]
    Ended,
}

/// The external media playback primitive which plays the playlist entries.
///
/// An engine holds at most one source at a time, setting a new source replaces the previous one.
/// The engine serializes its own calls, so the controller never needs to guard them.
#[async_trait]
pub trait PlaybackEngine: Debug + Display + Callback<EngineEvent> + Send + Sync {
    /// Load the given location as the source of the engine.
    async fn set_source(&self, location: String);

    /// Start or resume the playback of the loaded source.
    ///
    /// # Returns
    ///
    /// It returns an error when the engine is unable to play the source.
    async fn play(&self) -> Result<(), PlaybackError>;

    /// Pause the playback of the loaded source.
    async fn pause(&self);

    /// Move the playback position of the loaded source to the given time in millis.
    async fn set_position(&self, time: u64);
}
