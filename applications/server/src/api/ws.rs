/// WebSocket transport - one socket per listening client
use crate::{protocol::Envelope, services::SyncHub, state::AppState};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use lockstep_core::ConnectionId;
use std::sync::Arc;
use tokio::sync::mpsc;

/// GET /ws - Upgrade and join the shared session
pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.hub))
}

async fn handle_socket(socket: WebSocket, hub: Arc<SyncHub>) {
    let (id, outbound) = hub.connect().await;
    let (sink, stream) = socket.split();

    let mut writer = tokio::spawn(write_outbound(sink, outbound, id.clone()));
    let mut reader = tokio::spawn(read_inbound(stream, Arc::clone(&hub), id.clone()));

    // Whichever side finishes first takes the other down with it
    tokio::select! {
        _ = &mut writer => reader.abort(),
        _ = &mut reader => writer.abort(),
    }

    hub.disconnect(&id).await;
}

/// Drain the client's outbound queue into the socket
///
/// Ends when the hub drops the client (queue closed) or the socket fails.
async fn write_outbound(
    mut sink: futures_util::stream::SplitSink<WebSocket, Message>,
    mut outbound: mpsc::Receiver<Envelope>,
    id: ConnectionId,
) {
    while let Some(envelope) = outbound.recv().await {
        let text = match serde_json::to_string(&envelope) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(connection = %id, error = %e, "Failed to encode event");
                continue;
            }
        };

        if sink.send(Message::Text(text)).await.is_err() {
            tracing::debug!(connection = %id, "Socket closed while sending");
            return;
        }
    }

    let _ = sink.send(Message::Close(None)).await;
}

async fn read_inbound(
    mut stream: futures_util::stream::SplitStream<WebSocket>,
    hub: Arc<SyncHub>,
    id: ConnectionId,
) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                hub.handle_text(&id, &text).await;
            }
            Ok(Message::Close(_)) => return,
            Ok(Message::Binary(_)) => {
                tracing::warn!(connection = %id, "Ignoring binary frame");
            }
            // Ping/pong are answered by axum
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(connection = %id, error = %e, "Socket error");
                return;
            }
        }
    }
}
