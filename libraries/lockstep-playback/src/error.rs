//! Error types for playback state mutations

use thiserror::Error;

/// Reasons a mutation was rejected
///
/// A rejected mutation never changes the store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    /// Timestamp is NaN, infinite, or negative
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(f64),

    /// Selected index is outside the queue as it stands at apply time
    #[error("Index {index} out of range for queue of length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: i64,
        /// Queue length when the mutation was applied
        len: usize,
    },
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
