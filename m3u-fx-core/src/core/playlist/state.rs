use std::sync::Arc;

use log::trace;

use crate::core::playlist::Entry;
use crate::core::{Error, Result};

/// The live playlist together with the currently selected entry.
///
/// The entries can only be replaced as a whole through [PlaylistState::replace],
/// the selection is owned by the playback controller.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistState {
    entries: Arc<[Entry]>,
    current_index: Option<usize>,
}

impl PlaylistState {
    /// Create a fresh state for the given entries without any selection.
    pub fn replace(entries: Vec<Entry>) -> Self {
        trace!("Replacing playlist state with {} entries", entries.len());
        Self {
            entries: entries.into(),
            current_index: None,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The index of the selected entry, if any.
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// The selected entry, if any.
    pub fn current_entry(&self) -> Option<&Entry> {
        self.current_index.and_then(|e| self.entries.get(e))
    }

    /// The index after the current selection, wrapping to the first entry after the last one.
    /// Without a selection, the first entry is returned.
    ///
    /// It returns `None` when the playlist is empty.
    pub fn next_index(&self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        Some(match self.current_index {
            Some(index) => (index + 1) % self.len(),
            None => 0,
        })
    }

    /// The index before the current selection, wrapping to the last entry before the first one.
    /// Without a selection, the last entry is returned.
    ///
    /// It returns `None` when the playlist is empty.
    pub fn previous_index(&self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }

        Some(match self.current_index {
            Some(index) => (index + self.len() - 1) % self.len(),
            None => self.len() - 1,
        })
    }

    /// Update the selection, leaving the state untouched when the index is out of range.
    pub(crate) fn select(&mut self, index: Option<usize>) -> Result<()> {
        if let Some(index) = index {
            if index >= self.len() {
                return Err(Error::InvalidIndex(index, self.len()));
            }
        }

        self.current_index = index;
        Ok(())
    }
}

impl Default for PlaylistState {
    fn default() -> Self {
        Self::replace(vec![])
    }
}
