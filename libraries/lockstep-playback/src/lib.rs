//! Lockstep - Shared Playback State
//!
//! Transport-agnostic playback logic for Lockstep.
//!
//! This crate provides:
//! - Queue navigation with wraparound (next, previous, select)
//! - Catalogue merge that appends unseen songs by `url`
//! - A url-unique song queue with cheap shared snapshots
//! - The playback state store: one record of timestamp, play state, queue and cursor,
//!   changed only through total, all-or-nothing mutations
//!
//! # Architecture
//!
//! `lockstep-playback` owns no locks and knows nothing about sockets. The server wraps a
//! single `PlaybackStore` behind its own serialization point and broadcasts the
//! snapshots returned by `apply`.
//!
//! # Example
//!
//! ```rust
//! use lockstep_core::Song;
//! use lockstep_playback::{Effect, Mutation, PlaybackStore};
//!
//! let mut store = PlaybackStore::new();
//! store
//!     .apply(Mutation::Extend(vec![
//!         Song::new("u1", "library/a.mp3"),
//!         Song::new("u2", "library/b.mp3"),
//!     ]))
//!     .unwrap();
//!
//! let applied = store.apply(Mutation::Next).unwrap();
//! assert!(matches!(applied.effect, Effect::SongChanged { index: 1, .. }));
//! assert!(applied.snapshot.is_playing);
//!
//! // Wraps back to the first song
//! let applied = store.apply(Mutation::Next).unwrap();
//! assert_eq!(applied.snapshot.current_index, Some(0));
//! ```

mod error;
pub mod merge;
pub mod navigator;
mod queue;
mod store;

// Public exports
pub use error::{PlaybackError, Result};
pub use navigator::Direction;
pub use queue::SongQueue;
pub use store::{Applied, Effect, Mutation, PlaybackStore};
