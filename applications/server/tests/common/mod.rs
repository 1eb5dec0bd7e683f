//! Common test utilities and fixtures
#![allow(dead_code)]

use lockstep_core::Song;
use lockstep_playback::PlaybackStore;
use lockstep_server::{
    api,
    services::{AudioFiles, JsonLibrary, SyncHub, SyncPolicy},
    state::AppState,
    Envelope,
};
use std::{path::Path, sync::Arc};
use tokio::sync::mpsc;

/// Song with url `u{n}` stored at `library/song{n}.mp3`
pub fn song(n: usize) -> Song {
    Song::new(format!("u{}", n), format!("library/song{}.mp3", n))
        .with_name(format!("Song {}", n))
        .with_artist("Test Artist")
}

pub fn songs(range: std::ops::RangeInclusive<usize>) -> Vec<Song> {
    range.map(song).collect()
}

pub fn hub_with(songs: Vec<Song>) -> SyncHub {
    hub_with_policy(songs, SyncPolicy::LastWriterWins)
}

pub fn hub_with_policy(songs: Vec<Song>, policy: SyncPolicy) -> SyncHub {
    SyncHub::new(PlaybackStore::with_queue(songs), policy, 64)
}

/// Everything currently queued for a client
pub fn drain(rx: &mut mpsc::Receiver<Envelope>) -> Vec<Envelope> {
    let mut received = Vec::new();
    while let Ok(envelope) = rx.try_recv() {
        received.push(envelope);
    }
    received
}

/// Write a catalogue file holding `songs`
pub fn write_catalogue(path: &Path, songs: &[Song]) {
    let json = serde_json::to_vec_pretty(songs).unwrap();
    std::fs::write(path, json).unwrap();
}

/// Router over a temporary catalogue and audio directory
pub struct TestApp {
    pub router: axum::Router,
    pub hub: Arc<SyncHub>,
    pub library: Arc<JsonLibrary>,
    pub dir: tempfile::TempDir,
}

pub async fn create_test_app(initial: Vec<Song>) -> TestApp {
    let dir = tempfile::TempDir::new().unwrap();
    let audio_dir = dir.path().join("library");
    let library = JsonLibrary::new(dir.path().join("libdata.json"), audio_dir.clone());
    library.initialize().await.unwrap();
    let library = Arc::new(library);

    let hub = Arc::new(hub_with(initial));
    let audio_files = Arc::new(AudioFiles::new(audio_dir));
    let state = AppState::new(Arc::clone(&hub), library.clone(), audio_files);

    TestApp {
        router: api::create_router(state),
        hub,
        library,
        dir,
    }
}
