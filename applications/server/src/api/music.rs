/// Audio file download API
use crate::{
    error::{Result, ServerError},
    services::AudioFiles,
    state::AppState,
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

/// GET /music/:encoded_path
/// Stream an audio file named by the URL-safe base64 of its song path
pub async fn get_music(
    Path(encoded_path): Path<String>,
    State(app_state): State<AppState>,
) -> Result<Response> {
    // Undecodable paths are indistinguishable from missing files to the client
    let song_path = AudioFiles::decode_path(&encoded_path).map_err(|e| {
        tracing::debug!(error = %e, "Rejected music path");
        ServerError::NotFound("Audio file not found".to_string())
    })?;

    let file_path = app_state.audio_files.resolve(&song_path).await?;
    tracing::debug!(path = %file_path.display(), "Sending audio file");

    let metadata = tokio::fs::metadata(&file_path).await?;
    let mime_type = mime_guess::from_path(&file_path)
        .first_or_octet_stream()
        .to_string();
    let file_name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().replace('"', ""))
        .unwrap_or_default();

    let file = File::open(&file_path).await?;
    let body = Body::from_stream(ReaderStream::new(file));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime_type)
        .header(header::CONTENT_LENGTH, metadata.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        )
        .body(body)
        .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))
}
