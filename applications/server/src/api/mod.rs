/// API route modules
pub mod health;
pub mod library;
pub mod music;
pub mod ws;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full router: WebSocket session, library API and audio files
pub fn create_router(app_state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health::health))
        .route("/library", get(library::get_library))
        .route("/library/refresh", post(library::refresh_library))
        .route("/library/clear", post(library::clear_library));

    Router::new()
        .route("/ws", get(ws::upgrade))
        .route("/music/:encoded_path", get(music::get_music))
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
