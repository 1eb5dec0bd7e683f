/// Synchronization hub - the single serialization point over the playback store
use crate::{
    protocol::{ClientEvent, Envelope, ServerEvent},
    services::connections::ConnectionRegistry,
};
use chrono::{Duration, Utc};
use lockstep_core::{ConnectionId, PlaybackSnapshot, Song, SongInfo};
use lockstep_playback::{Applied, Effect, Mutation, PlaybackStore};
use tokio::sync::{mpsc, Mutex};

/// How a client `sync` is reconciled with the shared state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Every `sync` overwrites the shared state
    #[default]
    LastWriterWins,
    /// A `sync` arriving within `grace` of the last control event is not applied; the
    /// sender is sent the authoritative snapshot instead
    Advisory { grace: Duration },
}

/// What the hub did with an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// State was mutated and the result sent to every connected client
    Broadcast { seq: u64, recipients: usize },
    /// Only the requesting client was answered
    Unicast,
    /// Event discarded without touching state
    Dropped,
}

struct HubInner {
    store: PlaybackStore,
    seq: u64,
    connections: ConnectionRegistry,
}

impl HubInner {
    /// Apply under the lock and fan out the event built from the result
    ///
    /// Fan-out happens before the lock is released, so every client sees broadcasts in
    /// apply order.
    fn mutate<F>(&mut self, mutation: Mutation, to_event: F) -> Delivery
    where
        F: FnOnce(&Applied) -> ServerEvent,
    {
        match self.store.apply(mutation) {
            Ok(applied) => self.broadcast(to_event(&applied)),
            Err(err) => {
                tracing::warn!(error = %err, "Rejected mutation");
                Delivery::Dropped
            }
        }
    }

    fn broadcast(&mut self, event: ServerEvent) -> Delivery {
        self.seq += 1;
        let envelope = Envelope {
            seq: self.seq,
            event,
        };
        let recipients = self.connections.broadcast(&envelope);

        Delivery::Broadcast {
            seq: self.seq,
            recipients,
        }
    }

    fn send_snapshot(&mut self, to: &ConnectionId) -> Delivery {
        let envelope = Envelope {
            seq: self.seq,
            event: ServerEvent::snapshot(&self.store.read()),
        };

        if self.connections.unicast(to, envelope) {
            Delivery::Unicast
        } else {
            Delivery::Dropped
        }
    }
}

/// Owner of the shared playback state
///
/// Every read-modify-write goes through one FIFO-fair async mutex, so concurrent
/// events from different clients apply as a strict sequence in arrival order.
pub struct SyncHub {
    inner: Mutex<HubInner>,
    policy: SyncPolicy,
    outbound_buffer: usize,
}

impl SyncHub {
    pub fn new(store: PlaybackStore, policy: SyncPolicy, outbound_buffer: usize) -> Self {
        Self {
            inner: Mutex::new(HubInner {
                store,
                seq: 0,
                connections: ConnectionRegistry::new(),
            }),
            policy,
            outbound_buffer,
        }
    }

    /// Register a client and queue its initial snapshot
    ///
    /// The snapshot carries the current sequence number; every broadcast the client
    /// receives afterwards has a larger one.
    pub async fn connect(&self) -> (ConnectionId, mpsc::Receiver<Envelope>) {
        let mut inner = self.inner.lock().await;
        let (id, rx) = inner.connections.register(self.outbound_buffer);
        inner.send_snapshot(&id);

        tracing::info!(
            connection = %id,
            clients = inner.connections.len(),
            "Client connected"
        );

        (id, rx)
    }

    /// Drop a client from the fan-out set
    pub async fn disconnect(&self, id: &ConnectionId) {
        let mut inner = self.inner.lock().await;
        if inner.connections.remove(id) {
            tracing::info!(
                connection = %id,
                clients = inner.connections.len(),
                "Client disconnected"
            );
            if inner.connections.is_empty() {
                tracing::info!("No clients connected");
            }
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.inner.lock().await.connections.len()
    }

    pub async fn snapshot(&self) -> PlaybackSnapshot {
        self.inner.lock().await.store.read()
    }

    /// Parse and dispatch a raw text frame; malformed frames are logged and dropped
    pub async fn handle_text(&self, from: &ConnectionId, text: &str) -> Delivery {
        match ClientEvent::parse(text) {
            Ok(event) => self.dispatch(from, event).await,
            Err(err) => {
                tracing::warn!(connection = %from, error = %err, "Discarding malformed event");
                Delivery::Dropped
            }
        }
    }

    pub async fn dispatch(&self, from: &ConnectionId, event: ClientEvent) -> Delivery {
        tracing::debug!(connection = %from, event = event.name(), "Event received");

        match event {
            ClientEvent::Play { timestamp } => self.play(timestamp).await,
            ClientEvent::Pause { timestamp } => self.pause(timestamp).await,
            ClientEvent::Sync {
                timestamp,
                is_playing,
            } => self.sync(from, timestamp, is_playing).await,
            ClientEvent::Timestamp { timestamp } => self.timestamp(timestamp).await,
            ClientEvent::Seek { timestamp } => self.seek(timestamp).await,
            ClientEvent::NextSong => self.next_song().await,
            ClientEvent::PrevSong => self.prev_song().await,
            ClientEvent::SelectSong { index } => self.select_song(index).await,
            ClientEvent::RequestSync => self.request_sync(from).await,
        }
    }

    pub async fn play(&self, timestamp: f64) -> Delivery {
        let mut inner = self.inner.lock().await;
        inner.mutate(Mutation::SetPlaying(timestamp), |applied| {
            ServerEvent::transport(&applied.snapshot)
        })
    }

    pub async fn pause(&self, timestamp: f64) -> Delivery {
        let mut inner = self.inner.lock().await;
        inner.mutate(Mutation::SetPaused(timestamp), |applied| {
            ServerEvent::transport(&applied.snapshot)
        })
    }

    /// Client-initiated reconciliation
    pub async fn sync(&self, from: &ConnectionId, timestamp: f64, is_playing: bool) -> Delivery {
        let mut inner = self.inner.lock().await;

        if let SyncPolicy::Advisory { grace } = self.policy {
            let recent_control = inner
                .store
                .last_control_at()
                .is_some_and(|at| Utc::now() - at < grace);

            if recent_control {
                tracing::debug!(
                    connection = %from,
                    timestamp,
                    "Sync overlaps a recent control event, answering with authoritative state"
                );
                return inner.send_snapshot(from);
            }
        }

        inner.mutate(
            Mutation::SetSync {
                timestamp,
                is_playing,
            },
            |applied| ServerEvent::state(&applied.snapshot),
        )
    }

    /// Periodic drift correction
    pub async fn timestamp(&self, timestamp: f64) -> Delivery {
        let mut inner = self.inner.lock().await;
        inner.mutate(Mutation::SetTimestamp(timestamp), |applied| {
            ServerEvent::state(&applied.snapshot)
        })
    }

    pub async fn seek(&self, timestamp: f64) -> Delivery {
        let mut inner = self.inner.lock().await;
        inner.mutate(Mutation::Seek(timestamp), |applied| {
            ServerEvent::seek(&applied.snapshot)
        })
    }

    pub async fn next_song(&self) -> Delivery {
        let mut inner = self.inner.lock().await;
        inner.mutate(Mutation::Next, |applied| {
            song_event(&applied.effect, ServerEvent::NextSong)
        })
    }

    pub async fn prev_song(&self) -> Delivery {
        let mut inner = self.inner.lock().await;
        inner.mutate(Mutation::Prev, |applied| {
            song_event(&applied.effect, ServerEvent::PrevSong)
        })
    }

    /// Jump to `index`; a stale or negative index is dropped without broadcasting
    pub async fn select_song(&self, index: i64) -> Delivery {
        let mut inner = self.inner.lock().await;
        inner.mutate(Mutation::SelectIndex(index), |applied| {
            song_event(&applied.effect, ServerEvent::SongSelected)
        })
    }

    /// Answer the requester alone with the current snapshot
    pub async fn request_sync(&self, from: &ConnectionId) -> Delivery {
        let mut inner = self.inner.lock().await;
        inner.send_snapshot(from)
    }

    /// Append catalogue songs not yet queued
    ///
    /// A merge into a loaded queue leaves the cursor alone and sends nothing. A merge into
    /// an empty queue loads its first song, so every client gets a full snapshot.
    /// Returns the number of songs appended.
    pub async fn merge_library(&self, songs: Vec<Song>) -> usize {
        let mut inner = self.inner.lock().await;
        let incoming = songs.len();
        let was_loaded = inner.store.read().is_loaded();

        match inner.store.apply(Mutation::Extend(songs)) {
            Ok(Applied {
                effect: Effect::Extended { added },
                snapshot,
            }) => {
                tracing::info!(
                    incoming,
                    added,
                    total = snapshot.queue_len(),
                    "Merged catalogue into queue"
                );
                if !was_loaded && snapshot.is_loaded() {
                    tracing::info!("First song loaded, announcing to clients");
                    inner.broadcast(ServerEvent::snapshot(&snapshot));
                }
                added
            }
            Ok(_) => 0,
            Err(err) => {
                tracing::warn!(error = %err, "Catalogue merge rejected");
                0
            }
        }
    }

    /// Empty the queue and tell every client playback stopped
    pub async fn clear_library(&self) -> Delivery {
        let mut inner = self.inner.lock().await;
        tracing::info!("Clearing queue");
        inner.mutate(Mutation::Clear, |applied| {
            ServerEvent::state(&applied.snapshot)
        })
    }
}

/// Song event for a navigation result; an empty queue turns into `pause` at zero
fn song_event(effect: &Effect, make: fn(SongInfo) -> ServerEvent) -> ServerEvent {
    match effect {
        Effect::SongChanged { song, .. } => make(SongInfo::from(song)),
        _ => ServerEvent::Pause { timestamp: 0.0 },
    }
}
