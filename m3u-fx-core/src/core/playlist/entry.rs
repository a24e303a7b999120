use derive_more::Display;

/// The title used for entries which don't carry an `#EXTINF` title.
pub const UNKNOWN_TRACK_TITLE: &str = "Unknown Track";

/// A single playable item of a playlist.
///
/// The location of an entry has already been resolved against the base location of the playlist,
/// so it can be handed to the playback engine as-is.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
#[display("{} ({})", title, location)]
pub struct Entry {
    title: String,
    location: String,
}

impl Entry {
    /// Create a new entry.
    ///
    /// An empty title is replaced by [UNKNOWN_TRACK_TITLE].
    pub fn new<T: ToString, L: ToString>(title: T, location: L) -> Self {
        let title = title.to_string();

        Self {
            title: if title.trim().is_empty() {
                UNKNOWN_TRACK_TITLE.to_string()
            } else {
                title
            },
            location: location.to_string(),
        }
    }

    /// The display title of the entry.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// The resolved location of the entry.
    pub fn location(&self) -> &str {
        self.location.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let entry = Entry::new("Track A", "a.mp3");

        assert_eq!("Track A", entry.title());
        assert_eq!("a.mp3", entry.location());
    }

    #[test]
    fn test_new_empty_title() {
        let entry = Entry::new("  ", "a.mp3");

        assert_eq!(UNKNOWN_TRACK_TITLE, entry.title());
    }

    #[test]
    fn test_display() {
        let entry = Entry::new("Track B", "http://localhost/b.mp3");

        assert_eq!("Track B (http://localhost/b.mp3)", entry.to_string());
    }
}
