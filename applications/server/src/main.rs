/// Lockstep Server - shared listening session over WebSockets
use clap::{Parser, Subcommand};
use lockstep_core::LibrarySource;
use lockstep_playback::PlaybackStore;
use lockstep_server::{
    api,
    config::ServerConfig,
    services::{AudioFiles, JsonLibrary, SyncHub},
    state::AppState,
};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lockstep-server")]
#[command(about = "Lockstep shared listening server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP and WebSocket server
    Serve {
        /// Configuration file path
        #[arg(short, long, env = "LOCKSTEP_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Print the songs in the catalogue
    Library {
        /// Configuration file path
        #[arg(short, long, env = "LOCKSTEP_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lockstep_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(load_config(config)?).await?;
        }
        Commands::Library { config } => {
            list_library(load_config(config)?).await?;
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<ServerConfig> {
    let config = ServerConfig::load(path.as_deref())?;
    config.validate()?;
    Ok(config)
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Lockstep Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize the catalogue
    let library = JsonLibrary::new(
        config.library.catalogue_file.clone(),
        config.library.audio_dir.clone(),
    );
    library.initialize().await?;

    let songs = library.load().await?;
    tracing::info!(
        songs = songs.len(),
        catalogue = %config.library.catalogue_file.display(),
        "Catalogue loaded"
    );

    // Build the hub around the initial queue
    let hub = Arc::new(SyncHub::new(
        PlaybackStore::with_queue(songs),
        config.sync.policy(),
        config.sync.outbound_buffer,
    ));
    tracing::info!(policy = ?config.sync.policy, "Sync hub ready");

    let audio_files = Arc::new(AudioFiles::new(config.library.audio_dir.clone()));

    // Build application state
    let app_state = AppState::new(hub, Arc::new(library), audio_files);

    // Build router
    let app = api::create_router(app_state);

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

async fn list_library(config: ServerConfig) -> anyhow::Result<()> {
    let library = JsonLibrary::new(config.library.catalogue_file, config.library.audio_dir);
    let songs = library.load().await?;

    println!("Catalogue ({} songs):", songs.len());
    for (index, song) in songs.iter().enumerate() {
        let title = if song.name.is_empty() {
            song.path.as_str()
        } else {
            song.name.as_str()
        };
        if song.artist.is_empty() {
            println!("  {:>3}. {}", index, title);
        } else {
            println!("  {:>3}. {} - {}", index, title, song.artist);
        }
    }

    Ok(())
}
