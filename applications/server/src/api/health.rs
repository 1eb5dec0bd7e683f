/// Health check API routes
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Connected WebSocket clients
    pub clients: usize,
    /// Songs in the shared queue
    pub songs: usize,
}

/// GET /api/health - Liveness plus a glance at the shared session
pub async fn health(State(app_state): State<AppState>) -> Json<HealthResponse> {
    let clients = app_state.hub.connection_count().await;
    let songs = app_state.hub.snapshot().await.queue_len();

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        clients,
        songs,
    })
}
