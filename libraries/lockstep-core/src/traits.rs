/// Collaborator traits consumed by the synchronization core
use crate::error::Result;
use crate::types::Song;
use async_trait::async_trait;

/// Durable catalogue of downloaded songs
///
/// The acquisition pipeline appends entries to this list out of band. The core reads it
/// once at startup and again whenever a "library updated" signal arrives; it never
/// fetches or decodes audio itself.
#[async_trait]
pub trait LibrarySource: Send + Sync {
    /// Load every song currently recorded in the catalogue, in catalogue order
    ///
    /// # Errors
    /// Returns an error if the catalogue cannot be read or parsed
    async fn load(&self) -> Result<Vec<Song>>;

    /// Empty the catalogue and remove the audio files it refers to
    ///
    /// # Errors
    /// Returns an error if the catalogue or audio directory cannot be written
    async fn clear(&self) -> Result<()>;
}
