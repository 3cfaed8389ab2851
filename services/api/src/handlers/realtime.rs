use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use tokio::sync::broadcast::error::RecvError;

use crate::infra::realtime::BroadcastHub;
use crate::state::{AppState, Backend};

// ── GET /ws ──────────────────────────────────────────────────────────────────

pub async fn realtime_socket<B: Backend>(
    State(state): State<AppState<B>>,
    ws: WebSocketUpgrade,
) -> Response {
    let hub = state.realtime.clone();
    ws.on_upgrade(move |socket| forward_events(socket, hub))
}

/// Push every broadcast frame to one socket until either side goes away.
async fn forward_events(mut socket: WebSocket, hub: BroadcastHub) {
    let mut conn = hub.connect();
    loop {
        tokio::select! {
            frame = conn.receiver.recv() => match frame {
                Ok(text) => {
                    if socket.send(Message::Text(text.as_ref().into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(connection_id = conn.id, skipped, "realtime client lagging, events dropped");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Clients only listen; anything they send is ignored.
                Some(Ok(_)) => {}
            },
        }
    }
}
