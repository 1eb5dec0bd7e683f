//! Domain types shared by the playback store and the server

mod ids;
mod playback_state;
mod song;

pub use ids::ConnectionId;
pub use playback_state::PlaybackSnapshot;
pub use song::{Song, SongInfo};
