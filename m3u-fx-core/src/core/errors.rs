use std::result;

use thiserror::Error;

/// The result type of the m3u-fx core operations.
pub type Result<T> = result::Result<T, Error>;

/// The errors which can be reported by the m3u-fx core.
///
/// Every error which reaches the presentation layer is one of these kinds,
/// except [Error::InvalidIndex] which is only used internally.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// No playlist text or URL has been given.
    #[error("no playlist source has been given")]
    EmptySource,
    /// The remote playlist text could not be retrieved.
    #[error("failed to retrieve the playlist, {0}")]
    FetchFailure(String),
    /// The playlist has been parsed, but it didn't contain any playable entry.
    #[error("no valid tracks found in the playlist")]
    EmptyParse,
    /// The base location of the playlist is not a valid URL.
    #[error("base location {location} is invalid, {reason}")]
    InvalidBaseLocation { location: String, reason: String },
    /// The playback engine rejected the playback of an entry.
    #[error("could not play {title} ({location}), {reason}")]
    PlaybackFailure {
        title: String,
        location: String,
        reason: String,
    },
    /// A playback toggle has been requested while no playlist is loaded.
    #[error("no playlist has been loaded")]
    NoPlaylistLoaded,
    /// The index doesn't point to an entry of the playlist.
    #[error("index {0} is out of range for a playlist of {1} entries")]
    InvalidIndex(usize, usize),
}
