use thiserror::Error;

/// The errors which can be returned by a playback engine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlaybackError {
    /// The engine rejected the playback of the loaded source.
    #[error("{0}")]
    Rejected(String),
}
