/// Shared application state
use crate::services::{AudioFiles, SyncHub};
use lockstep_core::LibrarySource;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<SyncHub>,
    pub library: Arc<dyn LibrarySource>,
    pub audio_files: Arc<AudioFiles>,
}

impl AppState {
    pub fn new(
        hub: Arc<SyncHub>,
        library: Arc<dyn LibrarySource>,
        audio_files: Arc<AudioFiles>,
    ) -> Self {
        Self {
            hub,
            library,
            audio_files,
        }
    }
}
