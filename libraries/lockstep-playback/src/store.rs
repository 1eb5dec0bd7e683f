//! Playback state store
//!
//! The single record every client converges on. The store is plain data: callers own
//! the serialization point and must route every mutation through one `&mut` handle.

use crate::{
    error::{PlaybackError, Result},
    navigator::{self, Direction},
    queue::SongQueue,
};
use chrono::{DateTime, Utc};
use lockstep_core::{PlaybackSnapshot, Song};

/// A change requested against the shared playback state
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Resume at the given position
    SetPlaying(f64),
    /// Pause at the given position
    SetPaused(f64),
    /// Overwrite position and play state
    SetSync {
        /// Position in seconds
        timestamp: f64,
        /// Play state
        is_playing: bool,
    },
    /// Drift correction; play state unchanged
    SetTimestamp(f64),
    /// Discontinuous jump; play state unchanged
    Seek(f64),
    /// Advance one song, wrapping to the start
    Next,
    /// Go back one song, wrapping to the end
    Prev,
    /// Jump to a queue index, validated against the queue at apply time
    SelectIndex(i64),
    /// Append catalogue songs not already queued
    Extend(Vec<Song>),
    /// Empty the queue and stop playback
    Clear,
}

impl Mutation {
    /// Whether this mutation expresses explicit user intent
    ///
    /// Reconciliation traffic (`SetSync`, `SetTimestamp`) and catalogue merges are excluded.
    pub fn is_control(&self) -> bool {
        !matches!(
            self,
            Mutation::SetSync { .. } | Mutation::SetTimestamp(_) | Mutation::Extend(_)
        )
    }

    fn timestamp(&self) -> Option<f64> {
        match self {
            Mutation::SetPlaying(ts)
            | Mutation::SetPaused(ts)
            | Mutation::SetTimestamp(ts)
            | Mutation::Seek(ts)
            | Mutation::SetSync { timestamp: ts, .. } => Some(*ts),
            _ => None,
        }
    }
}

/// What an applied mutation did, beyond the resulting snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Position and/or play state changed
    Updated,
    /// Position jumped; clients must not interpolate across it
    Seeked,
    /// The cursor moved to a song
    SongChanged {
        /// New current index
        index: usize,
        /// Song now under the cursor
        song: Song,
    },
    /// A navigation request found an empty queue; playback stopped
    NothingToPlay,
    /// Catalogue songs were appended
    Extended {
        /// Number of songs appended
        added: usize,
    },
    /// Queue emptied
    Cleared,
}

/// Outcome of a successful `apply`
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    /// State right after the mutation
    pub snapshot: PlaybackSnapshot,
    /// What changed
    pub effect: Effect,
}

/// The shared playback record
#[derive(Debug, Clone)]
pub struct PlaybackStore {
    timestamp: f64,
    is_playing: bool,
    queue: SongQueue,
    current_index: Option<usize>,
    updated_at: DateTime<Utc>,
    last_control_at: Option<DateTime<Utc>>,
}

impl PlaybackStore {
    /// Create an empty store: nothing loaded, paused at zero
    pub fn new() -> Self {
        Self {
            timestamp: 0.0,
            is_playing: false,
            queue: SongQueue::new(),
            current_index: None,
            updated_at: Utc::now(),
            last_control_at: None,
        }
    }

    /// Create a store preloaded with the startup catalogue
    pub fn with_queue(songs: Vec<Song>) -> Self {
        let mut store = Self::new();
        store.queue = SongQueue::from_songs(songs);
        if !store.queue.is_empty() {
            store.current_index = Some(0);
        }
        store
    }

    /// Immutable copy of the current state
    pub fn read(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            timestamp: self.timestamp,
            is_playing: self.is_playing,
            queue: self.queue.shared(),
            current_index: self.current_index,
            updated_at: self.updated_at,
        }
    }

    /// Instant of the last control mutation (play, pause, seek, navigation, clear)
    pub fn last_control_at(&self) -> Option<DateTime<Utc>> {
        self.last_control_at
    }

    /// Apply a mutation stamped with the current time
    pub fn apply(&mut self, mutation: Mutation) -> Result<Applied> {
        self.apply_at(mutation, Utc::now())
    }

    /// Apply a mutation stamped with `now`
    ///
    /// All-or-nothing: on error the store is left exactly as it was.
    pub fn apply_at(&mut self, mutation: Mutation, now: DateTime<Utc>) -> Result<Applied> {
        if let Some(ts) = mutation.timestamp() {
            if !ts.is_finite() || ts < 0.0 {
                return Err(PlaybackError::InvalidTimestamp(ts));
            }
        }

        let is_control = mutation.is_control();

        let effect = match mutation {
            Mutation::SetPlaying(ts) => {
                self.timestamp = ts;
                self.is_playing = true;
                Effect::Updated
            }
            Mutation::SetPaused(ts) => {
                self.timestamp = ts;
                self.is_playing = false;
                Effect::Updated
            }
            Mutation::SetSync {
                timestamp,
                is_playing,
            } => {
                self.timestamp = timestamp;
                self.is_playing = is_playing;
                Effect::Updated
            }
            Mutation::SetTimestamp(ts) => {
                self.timestamp = ts;
                Effect::Updated
            }
            Mutation::Seek(ts) => {
                self.timestamp = ts;
                Effect::Seeked
            }
            Mutation::Next => self.navigate(Direction::Forward),
            Mutation::Prev => self.navigate(Direction::Backward),
            Mutation::SelectIndex(index) => {
                let resolved = navigator::resolve_index(index, self.queue.len()).ok_or(
                    PlaybackError::IndexOutOfRange {
                        index,
                        len: self.queue.len(),
                    },
                )?;
                self.load(resolved)
            }
            Mutation::Extend(songs) => {
                let added = self.queue.extend(songs);
                if self.current_index.is_none() && !self.queue.is_empty() {
                    self.current_index = Some(0);
                }
                Effect::Extended { added }
            }
            Mutation::Clear => {
                self.queue.clear();
                self.current_index = None;
                self.is_playing = false;
                Effect::Cleared
            }
        };

        // Nothing loaded means nothing playing
        if self.queue.is_empty() {
            self.is_playing = false;
        }

        self.updated_at = now;
        if is_control {
            self.last_control_at = Some(now);
        }

        Ok(Applied {
            snapshot: self.read(),
            effect,
        })
    }

    fn navigate(&mut self, direction: Direction) -> Effect {
        let current = self.current_index.unwrap_or(0);
        match navigator::step(current, self.queue.len(), direction) {
            Some(index) => self.load(index),
            None => {
                self.is_playing = false;
                Effect::NothingToPlay
            }
        }
    }

    fn load(&mut self, index: usize) -> Effect {
        match self.queue.get(index) {
            Some(song) => {
                let song = song.clone();
                self.current_index = Some(index);
                self.is_playing = true;
                Effect::SongChanged { index, song }
            }
            None => {
                self.is_playing = false;
                Effect::NothingToPlay
            }
        }
    }
}

impl Default for PlaybackStore {
    fn default() -> Self {
        Self::new()
    }
}
