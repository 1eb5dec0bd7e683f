/// Catalogue entry types
use serde::{Deserialize, Serialize};

/// One catalogue entry
///
/// Created by the acquisition pipeline and never mutated afterwards. Field names match
/// the on-disk catalogue list so entries round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Stable external identity; the dedup key within a queue
    pub url: String,

    /// Location of the playable audio, resolved by the file-serving collaborator
    pub path: String,

    /// Track title (may be empty)
    #[serde(default)]
    pub name: String,

    /// Artist name (may be empty)
    #[serde(default)]
    pub artist: String,

    /// Artwork reference
    #[serde(default)]
    pub cover_url: Option<String>,
}

impl Song {
    /// Create a song with empty display metadata
    pub fn new(url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
            name: String::new(),
            artist: String::new(),
            cover_url: None,
        }
    }

    /// Set the display title
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the artist
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    /// Set the artwork reference
    #[must_use]
    pub fn with_cover_url(mut self, cover_url: impl Into<String>) -> Self {
        self.cover_url = Some(cover_url.into());
        self
    }
}

/// Display fields of a song as broadcast to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongInfo {
    /// Audio location the client should fetch
    pub filename: String,
    /// Track title
    pub title: String,
    /// Artist name
    pub artist: String,
    /// Artwork reference
    pub cover_art: Option<String>,
}

impl From<&Song> for SongInfo {
    fn from(song: &Song) -> Self {
        Self {
            filename: song.path.clone(),
            title: song.name.clone(),
            artist: song.artist.clone(),
            cover_art: song.cover_url.clone(),
        }
    }
}
