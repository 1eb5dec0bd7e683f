/// Server services
pub mod audio_files;
pub mod connections;
pub mod hub;
pub mod library;

pub use audio_files::AudioFiles;
pub use connections::ConnectionRegistry;
pub use hub::{Delivery, SyncHub, SyncPolicy};
pub use library::JsonLibrary;
