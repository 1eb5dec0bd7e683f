/// Wire protocol between clients and the hub
///
/// Inbound frames are `{"event": "<name>", "data": {...}}`; `data` may be omitted for
/// events without a payload. Outbound frames add a `seq` number that increases with
/// every broadcast so clients can discard stale or reordered deliveries.
use lockstep_core::{PlaybackSnapshot, SongInfo};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Why an inbound frame was discarded
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Frame is not a JSON event: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    #[error("Malformed {event} payload: {source}")]
    Malformed {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid {field} in {event}: {reason}")]
    InvalidField {
        event: &'static str,
        field: &'static str,
        reason: String,
    },
}

/// Control event sent by a client
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Play { timestamp: f64 },
    Pause { timestamp: f64 },
    Sync { timestamp: f64, is_playing: bool },
    Timestamp { timestamp: f64 },
    Seek { timestamp: f64 },
    NextSong,
    PrevSong,
    SelectSong { index: i64 },
    RequestSync,
}

#[derive(Deserialize)]
struct RawEvent {
    event: String,
    #[serde(default)]
    data: Value,
}

#[derive(Deserialize)]
struct TimestampPayload {
    timestamp: f64,
}

#[derive(Deserialize)]
struct SyncPayload {
    timestamp: f64,
    is_playing: bool,
}

#[derive(Deserialize)]
struct SelectPayload {
    index: i64,
}

impl ClientEvent {
    /// Parse one text frame
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let raw: RawEvent = serde_json::from_str(text).map_err(ProtocolError::InvalidJson)?;

        let event = match raw.event.as_str() {
            "play" => ClientEvent::Play {
                timestamp: timestamp_of("play", raw.data)?,
            },
            "pause" => ClientEvent::Pause {
                timestamp: timestamp_of("pause", raw.data)?,
            },
            "timestamp" => ClientEvent::Timestamp {
                timestamp: timestamp_of("timestamp", raw.data)?,
            },
            "seek" => ClientEvent::Seek {
                timestamp: timestamp_of("seek", raw.data)?,
            },
            "sync" => {
                let payload: SyncPayload = payload("sync", raw.data)?;
                ClientEvent::Sync {
                    timestamp: checked_timestamp("sync", payload.timestamp)?,
                    is_playing: payload.is_playing,
                }
            }
            "select_song" => {
                let payload: SelectPayload = payload("select_song", raw.data)?;
                ClientEvent::SelectSong {
                    index: payload.index,
                }
            }
            "next_song" => ClientEvent::NextSong,
            "prev_song" => ClientEvent::PrevSong,
            "request_sync" => ClientEvent::RequestSync,
            _ => return Err(ProtocolError::UnknownEvent(raw.event)),
        };

        Ok(event)
    }

    /// Wire name of the event, for logging
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::Play { .. } => "play",
            ClientEvent::Pause { .. } => "pause",
            ClientEvent::Sync { .. } => "sync",
            ClientEvent::Timestamp { .. } => "timestamp",
            ClientEvent::Seek { .. } => "seek",
            ClientEvent::NextSong => "next_song",
            ClientEvent::PrevSong => "prev_song",
            ClientEvent::SelectSong { .. } => "select_song",
            ClientEvent::RequestSync => "request_sync",
        }
    }
}

fn payload<T: DeserializeOwned>(event: &'static str, data: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(data).map_err(|source| ProtocolError::Malformed { event, source })
}

fn timestamp_of(event: &'static str, data: Value) -> Result<f64, ProtocolError> {
    let payload: TimestampPayload = payload(event, data)?;
    checked_timestamp(event, payload.timestamp)
}

fn checked_timestamp(event: &'static str, timestamp: f64) -> Result<f64, ProtocolError> {
    if timestamp.is_finite() && timestamp >= 0.0 {
        Ok(timestamp)
    } else {
        Err(ProtocolError::InvalidField {
            event,
            field: "timestamp",
            reason: format!("{} is not a non-negative number of seconds", timestamp),
        })
    }
}

/// Marks a `sync` that must not be interpolated across
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Seek,
}

/// Body of an outbound `sync`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncState {
    pub timestamp: f64,
    pub is_playing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<SyncAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song: Option<SongInfo>,
}

/// Event sent by the hub to one or all clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    Sync(SyncState),
    Play { timestamp: f64 },
    Pause { timestamp: f64 },
    NextSong(SongInfo),
    PrevSong(SongInfo),
    SongSelected(SongInfo),
}

impl ServerEvent {
    /// Full snapshot for a joining or recovering client, including the current song
    pub fn snapshot(state: &PlaybackSnapshot) -> Self {
        ServerEvent::Sync(SyncState {
            timestamp: state.timestamp,
            is_playing: state.is_playing,
            action: None,
            song: state.current_song_info(),
        })
    }

    /// Position and play state only
    pub fn state(state: &PlaybackSnapshot) -> Self {
        ServerEvent::Sync(SyncState {
            timestamp: state.timestamp,
            is_playing: state.is_playing,
            action: None,
            song: None,
        })
    }

    /// Seek-tagged position update
    pub fn seek(state: &PlaybackSnapshot) -> Self {
        ServerEvent::Sync(SyncState {
            timestamp: state.timestamp,
            is_playing: state.is_playing,
            action: Some(SyncAction::Seek),
            song: None,
        })
    }

    /// `play` or `pause` at the snapshot position, whichever the store settled on
    pub fn transport(state: &PlaybackSnapshot) -> Self {
        if state.is_playing {
            ServerEvent::Play {
                timestamp: state.timestamp,
            }
        } else {
            ServerEvent::Pause {
                timestamp: state.timestamp,
            }
        }
    }
}

/// Outbound frame: an event stamped with the hub sequence number
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub seq: u64,
    #[serde(flatten)]
    pub event: ServerEvent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockstep_core::Song;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn parses_timestamp_events() {
        let event = ClientEvent::parse(r#"{"event": "seek", "data": {"timestamp": 42.0}}"#).unwrap();
        assert_eq!(event, ClientEvent::Seek { timestamp: 42.0 });

        let event = ClientEvent::parse(r#"{"event": "play", "data": {"timestamp": 3}}"#).unwrap();
        assert_eq!(event, ClientEvent::Play { timestamp: 3.0 });
    }

    #[test]
    fn parses_sync() {
        let event = ClientEvent::parse(
            r#"{"event": "sync", "data": {"timestamp": 1.5, "is_playing": true}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            ClientEvent::Sync {
                timestamp: 1.5,
                is_playing: true
            }
        );
    }

    #[test]
    fn payload_is_optional_for_navigation() {
        assert_eq!(
            ClientEvent::parse(r#"{"event": "next_song"}"#).unwrap(),
            ClientEvent::NextSong
        );
        assert_eq!(
            ClientEvent::parse(r#"{"event": "prev_song", "data": {}}"#).unwrap(),
            ClientEvent::PrevSong
        );
        assert_eq!(
            ClientEvent::parse(r#"{"event": "request_sync"}"#).unwrap(),
            ClientEvent::RequestSync
        );
    }

    #[test]
    fn negative_index_parses() {
        let event =
            ClientEvent::parse(r#"{"event": "select_song", "data": {"index": -1}}"#).unwrap();
        assert_eq!(event, ClientEvent::SelectSong { index: -1 });
    }

    #[test]
    fn missing_field_is_malformed() {
        let err = ClientEvent::parse(r#"{"event": "play", "data": {}}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed { event: "play", .. }));

        let err = ClientEvent::parse(r#"{"event": "sync", "data": {"timestamp": 1}}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed { event: "sync", .. }));

        let err = ClientEvent::parse(r#"{"event": "seek"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed { event: "seek", .. }));
    }

    #[test]
    fn negative_timestamp_is_invalid() {
        let err =
            ClientEvent::parse(r#"{"event": "pause", "data": {"timestamp": -2}}"#).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::InvalidField {
                field: "timestamp",
                ..
            }
        ));
    }

    #[test]
    fn unknown_and_garbage_frames() {
        assert!(matches!(
            ClientEvent::parse(r#"{"event": "dance"}"#),
            Err(ProtocolError::UnknownEvent(name)) if name == "dance"
        ));
        assert!(matches!(
            ClientEvent::parse("not json"),
            Err(ProtocolError::InvalidJson(_))
        ));
    }

    #[test]
    fn envelope_wire_format() {
        let envelope = Envelope {
            seq: 7,
            event: ServerEvent::Play { timestamp: 12.0 },
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({"seq": 7, "event": "play", "data": {"timestamp": 12.0}})
        );
    }

    #[test]
    fn seek_sync_carries_action() {
        let snapshot = PlaybackSnapshot {
            timestamp: 42.0,
            ..PlaybackSnapshot::empty()
        };
        let value = serde_json::to_value(ServerEvent::seek(&snapshot)).unwrap();
        assert_eq!(
            value,
            json!({"event": "sync", "data": {"timestamp": 42.0, "is_playing": false, "action": "seek"}})
        );
    }

    #[test]
    fn snapshot_includes_current_song() {
        let snapshot = PlaybackSnapshot {
            queue: Arc::new(vec![Song::new("u1", "library/a.mp3").with_name("A")]),
            current_index: Some(0),
            ..PlaybackSnapshot::empty()
        };
        let value = serde_json::to_value(ServerEvent::snapshot(&snapshot)).unwrap();
        assert_eq!(value["data"]["song"]["filename"], "library/a.mp3");
        assert_eq!(value["data"]["song"]["title"], "A");
        assert_eq!(value["data"]["song"]["cover_art"], Value::Null);
    }

    #[test]
    fn song_events_use_display_fields() {
        let info = SongInfo::from(&Song::new("u2", "library/b.mp3").with_artist("B"));
        let value = serde_json::to_value(ServerEvent::SongSelected(info)).unwrap();
        assert_eq!(value["event"], "song_selected");
        assert_eq!(value["data"]["artist"], "B");
    }
}
