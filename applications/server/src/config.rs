/// Server configuration
use crate::{
    error::{Result, ServerError},
    services::SyncPolicy,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "lockstep.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_library")]
    pub library: LibrarySettings,

    #[serde(default = "default_sync")]
    pub sync: SyncSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    /// JSON list of downloaded songs
    #[serde(default = "default_catalogue_file")]
    pub catalogue_file: PathBuf,

    /// Directory the audio files live in; `/music` never serves anything outside it
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncSettings {
    #[serde(default)]
    pub policy: SyncPolicyKind,

    /// Window after a control event during which `advisory` ignores client syncs
    #[serde(default = "default_grace_ms")]
    pub grace_ms: u64,

    /// Messages buffered per client before a slow client is dropped
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPolicyKind {
    #[default]
    LastWriterWins,
    Advisory,
}

impl SyncSettings {
    pub fn policy(&self) -> SyncPolicy {
        match self.policy {
            SyncPolicyKind::LastWriterWins => SyncPolicy::LastWriterWins,
            SyncPolicyKind::Advisory => SyncPolicy::Advisory {
                grace: chrono::Duration::milliseconds(
                    i64::try_from(self.grace_ms).unwrap_or(i64::MAX),
                ),
            },
        }
    }
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// `path` overrides the default `lockstep.toml`; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables, e.g. LOCKSTEP_SYNC__GRACE_MS
        settings = settings.add_source(
            config::Environment::with_prefix("LOCKSTEP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.library.catalogue_file.as_os_str().is_empty() {
            return Err(ServerError::Config(
                "Catalogue file path is required (set LOCKSTEP_LIBRARY__CATALOGUE_FILE)"
                    .to_string(),
            ));
        }

        if self.library.audio_dir.as_os_str().is_empty() {
            return Err(ServerError::Config(
                "Audio directory is required (set LOCKSTEP_LIBRARY__AUDIO_DIR)".to_string(),
            ));
        }

        if self.sync.outbound_buffer == 0 {
            return Err(ServerError::Config(
                "sync.outbound_buffer must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5135
}

fn default_library() -> LibrarySettings {
    LibrarySettings {
        catalogue_file: default_catalogue_file(),
        audio_dir: default_audio_dir(),
    }
}

fn default_catalogue_file() -> PathBuf {
    PathBuf::from("libdata.json")
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("library")
}

fn default_sync() -> SyncSettings {
    SyncSettings {
        policy: SyncPolicyKind::default(),
        grace_ms: default_grace_ms(),
        outbound_buffer: default_outbound_buffer(),
    }
}

fn default_grace_ms() -> u64 {
    1500
}

fn default_outbound_buffer() -> usize {
    256
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            library: default_library(),
            sync: default_sync(),
        }
    }
}
