/// Library API routes
use crate::{error::Result, state::AppState};
use axum::{extract::State, Json};
use lockstep_core::Song;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub status: &'static str,
    pub added: usize,
    pub queue: Vec<Song>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// GET /api/library - Current shared queue
pub async fn get_library(State(app_state): State<AppState>) -> Json<Vec<Song>> {
    let snapshot = app_state.hub.snapshot().await;
    Json(snapshot.queue.to_vec())
}

/// POST /api/library/refresh - Merge newly downloaded songs into the queue
pub async fn refresh_library(State(app_state): State<AppState>) -> Result<Json<RefreshResponse>> {
    let songs = app_state.library.load().await?;
    let added = app_state.hub.merge_library(songs).await;
    let snapshot = app_state.hub.snapshot().await;

    Ok(Json(RefreshResponse {
        status: "ok",
        added,
        queue: snapshot.queue.to_vec(),
    }))
}

/// POST /api/library/clear - Delete the catalogue and its audio files and empty the queue
pub async fn clear_library(State(app_state): State<AppState>) -> Result<Json<StatusResponse>> {
    app_state.library.clear().await?;
    app_state.hub.clear_library().await;

    Ok(Json(StatusResponse { status: "ok" }))
}
