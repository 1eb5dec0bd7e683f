//! Shared song queue
//!
//! Insertion order is playback order. The list is held behind an `Arc` so snapshots
//! share it; a mutation copies the list only while a snapshot still holds the old one.

use crate::merge;
use lockstep_core::Song;
use std::sync::Arc;

/// Ordered, url-unique list of songs
#[derive(Debug, Clone, Default)]
pub struct SongQueue {
    songs: Arc<Vec<Song>>,
}

impl SongQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a queue from a catalogue list, dropping repeated urls
    pub fn from_songs(songs: Vec<Song>) -> Self {
        let mut queue = Self::new();
        queue.extend(songs);
        queue
    }

    /// Append every song whose url is not already queued
    ///
    /// Returns the number of songs appended.
    pub fn extend(&mut self, incoming: Vec<Song>) -> usize {
        let added = merge::new_songs(&self.songs, incoming);
        let count = added.len();

        if count > 0 {
            Arc::make_mut(&mut self.songs).extend(added);
        }

        count
    }

    /// Remove every song
    pub fn clear(&mut self) {
        if !self.songs.is_empty() {
            self.songs = Arc::new(Vec::new());
        }
    }

    /// Get song at index
    pub fn get(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    /// Total number of songs in queue
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Shared handle to the current list, for snapshots
    pub fn shared(&self) -> Arc<Vec<Song>> {
        Arc::clone(&self.songs)
    }

    /// Iterate songs in playback order
    pub fn iter(&self) -> impl Iterator<Item = &Song> {
        self.songs.iter()
    }
}
