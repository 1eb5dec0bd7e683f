//! Lockstep Core
//!
//! Transport-agnostic types, traits, and error handling for Lockstep, a shared listening
//! server where every connected client follows one server-owned playback queue.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Song`, `SongInfo`, `PlaybackSnapshot`, `ConnectionId`
//! - **Collaborator Traits**: `LibrarySource` (the durable catalogue list)
//! - **Error Handling**: Unified `LockstepError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use lockstep_core::types::{Song, SongInfo};
//!
//! let song = Song::new("https://example.com/watch?v=1", "library/one.mp3")
//!     .with_name("One")
//!     .with_artist("Someone");
//!
//! let info = SongInfo::from(&song);
//! assert_eq!(info.filename, "library/one.mp3");
//! assert_eq!(info.title, "One");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{LockstepError, Result};
pub use traits::LibrarySource;
pub use types::{ConnectionId, PlaybackSnapshot, Song, SongInfo};
