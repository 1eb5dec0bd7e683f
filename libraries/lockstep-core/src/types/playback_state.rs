/// Playback state snapshot shared with every connected client
use super::song::{Song, SongInfo};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Immutable copy of the shared playback state at one point in time
///
/// Safe to hand to any number of readers without further synchronization. Cloning is
/// cheap: the queue is shared, not copied.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    /// Position within the current song, in seconds
    pub timestamp: f64,

    /// Whether the group is playing
    pub is_playing: bool,

    /// Songs in playback order
    pub queue: Arc<Vec<Song>>,

    /// Index of the current song; `None` when the queue is empty
    pub current_index: Option<usize>,

    /// Instant of the last applied mutation
    pub updated_at: DateTime<Utc>,
}

impl PlaybackSnapshot {
    /// Snapshot of a freshly started process: nothing loaded, nothing playing
    pub fn empty() -> Self {
        Self {
            timestamp: 0.0,
            is_playing: false,
            queue: Arc::new(Vec::new()),
            current_index: None,
            updated_at: Utc::now(),
        }
    }

    /// Song under the cursor, if anything is loaded
    pub fn current_song(&self) -> Option<&Song> {
        self.current_index.and_then(|index| self.queue.get(index))
    }

    /// Display fields of the song under the cursor
    pub fn current_song_info(&self) -> Option<SongInfo> {
        self.current_song().map(SongInfo::from)
    }

    /// Whether a song is loaded; an empty queue always reads as "nothing loaded"
    pub fn is_loaded(&self) -> bool {
        self.current_song().is_some()
    }

    /// Number of songs in the queue
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
