/// Audio file resolution for `/music` - maps encoded song paths to files on disk
use crate::error::{Result, ServerError};
use base64::{
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
    Engine as _,
};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone)]
pub struct AudioFiles {
    root: PathBuf,
}

impl AudioFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Decode a URL-safe base64 path segment, padded or not
    pub fn decode_path(encoded: &str) -> Result<String> {
        let bytes = URL_SAFE
            .decode(encoded)
            .or_else(|_| URL_SAFE_NO_PAD.decode(encoded))
            .map_err(|e| ServerError::BadRequest(format!("Invalid encoded path: {}", e)))?;

        String::from_utf8(bytes)
            .map_err(|_| ServerError::BadRequest("Encoded path is not UTF-8".to_string()))
    }

    /// Resolve a song path to a file inside the audio directory
    ///
    /// Song paths are recorded relative to the working directory (`library/a.mp3`), so the
    /// path is tried as given, then relative to the audio directory, then by file name
    /// alone. Anything that resolves outside the audio directory is reported as not found.
    pub async fn resolve(&self, song_path: &str) -> Result<PathBuf> {
        let root = fs::canonicalize(&self.root)
            .await
            .map_err(|e| ServerError::Internal(format!("Audio directory unavailable: {}", e)))?;

        let requested = Path::new(song_path);
        let mut candidates = vec![requested.to_path_buf(), self.root.join(requested)];
        if let Some(name) = requested.file_name() {
            candidates.push(self.root.join(name));
        }

        for candidate in candidates {
            let Ok(resolved) = fs::canonicalize(&candidate).await else {
                continue;
            };

            if !resolved.starts_with(&root) {
                tracing::warn!(path = song_path, "Rejected path outside audio directory");
                continue;
            }

            if fs::metadata(&resolved).await.map(|m| m.is_file()).unwrap_or(false) {
                return Ok(resolved);
            }
        }

        Err(ServerError::NotFound(format!("No audio file for {}", song_path)))
    }
}
