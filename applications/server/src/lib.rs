//! Lockstep Server Library
//!
//! Shared listening server: one authoritative playback state, a song queue built from the
//! downloaded catalogue, and every connected client kept in step over WebSockets.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod protocol;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use protocol::{ClientEvent, Envelope, ServerEvent};
pub use services::{AudioFiles, Delivery, JsonLibrary, SyncHub, SyncPolicy};
pub use state::AppState;
