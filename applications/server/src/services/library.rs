/// Catalogue file - the durable list of downloaded songs
use async_trait::async_trait;
use lockstep_core::{LibrarySource, Result, Song};
use std::path::PathBuf;
use tokio::fs;

/// Catalogue stored as a JSON array next to the directory holding the audio files
#[derive(Debug, Clone)]
pub struct JsonLibrary {
    catalogue_file: PathBuf,
    audio_dir: PathBuf,
}

impl JsonLibrary {
    pub fn new(catalogue_file: impl Into<PathBuf>, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalogue_file: catalogue_file.into(),
            audio_dir: audio_dir.into(),
        }
    }

    /// Create the audio directory and an empty catalogue if either is missing
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.audio_dir).await?;

        if fs::try_exists(&self.catalogue_file).await? {
            return Ok(());
        }

        if let Some(parent) = self.catalogue_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        fs::write(&self.catalogue_file, b"[]").await?;
        tracing::info!(path = %self.catalogue_file.display(), "Created empty catalogue");

        Ok(())
    }
}

#[async_trait]
impl LibrarySource for JsonLibrary {
    async fn load(&self) -> Result<Vec<Song>> {
        let bytes = match fs::read(&self.catalogue_file).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let songs = serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(
                path = %self.catalogue_file.display(),
                error = %e,
                "Catalogue is not a list of songs"
            );
            e
        })?;

        Ok(songs)
    }

    async fn clear(&self) -> Result<()> {
        fs::write(&self.catalogue_file, b"[]").await?;

        let mut entries = match fs::read_dir(&self.audio_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let mut removed = 0usize;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                fs::remove_file(entry.path()).await?;
                removed += 1;
            }
        }

        tracing::info!(
            removed,
            audio_dir = %self.audio_dir.display(),
            "Cleared catalogue and audio files"
        );

        Ok(())
    }
}
