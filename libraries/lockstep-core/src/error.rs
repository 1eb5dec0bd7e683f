/// Core error types for Lockstep
use thiserror::Error;

/// Result type alias using `LockstepError`
pub type Result<T> = std::result::Result<T, LockstepError>;

/// Core error type for Lockstep
#[derive(Error, Debug)]
pub enum LockstepError {
    /// Catalogue could not be read or written
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catalogue is not a list of songs
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}
