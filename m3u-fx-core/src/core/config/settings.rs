use std::fs;
use std::path::Path;
use std::time::Duration;

use derive_more::Display;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::VERSION;

const DEFAULT_AUTO_PLAY: fn() -> bool = || true;
const DEFAULT_USER_AGENT: fn() -> String = || format!("m3u-fx/{}", VERSION);
const DEFAULT_FETCH_TIMEOUT_SECS: fn() -> u64 = || 30;

/// The settings of the m3u-fx player.
#[derive(Debug, Display, Clone, Serialize, Deserialize, PartialEq)]
#[display(
    "auto_play: {}, user_agent: {}, fetch_timeout_secs: {}",
    auto_play,
    user_agent,
    fetch_timeout_secs
)]
pub struct PlayerSettings {
    /// Indicates if the first entry should be played as soon as a playlist has been loaded
    #[serde(default = "DEFAULT_AUTO_PLAY")]
    pub auto_play: bool,
    /// The user agent used when retrieving remote playlists
    #[serde(default = "DEFAULT_USER_AGENT")]
    pub user_agent: String,
    /// The max duration in seconds of retrieving a remote playlist
    #[serde(default = "DEFAULT_FETCH_TIMEOUT_SECS")]
    pub fetch_timeout_secs: u64,
}

impl PlayerSettings {
    /// Parse the settings from the given JSON value.
    /// If the `value` is invalid, the defaults will be returned.
    pub fn from_str(value: &str) -> Self {
        trace!("Parsing player settings \"{}\"", value);
        match serde_json::from_str::<PlayerSettings>(value) {
            Ok(e) => {
                debug!("Player settings parsed, {}", e);
                e
            }
            Err(e) => {
                warn!("Failed to deserialize player settings, {}, using defaults instead", e);
                Self::default()
            }
        }
    }

    /// Read the settings from the given JSON file.
    /// If the file can't be read, the defaults will be returned.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(data) => Self::from_str(data.as_str()),
            Err(e) => {
                warn!(
                    "Failed to read player settings file {:?}, {}, using defaults instead",
                    path, e
                );
                Self::default()
            }
        }
    }

    /// The timeout of retrieving a remote playlist.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            auto_play: DEFAULT_AUTO_PLAY(),
            user_agent: DEFAULT_USER_AGENT(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS(),
        }
    }
}
