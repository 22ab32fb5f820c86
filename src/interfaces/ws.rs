use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::debug;

use crate::state::AppState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| run_connection(socket, state))
}

/// Drives one client from connect to disconnect.
///
/// Outbound frames are queued by the registry and written by a dedicated
/// task, so broadcasts never wait on this socket.
async fn run_connection(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let session = state.coordinator.open_session(tx);
    let id = session.id();

    let mut writer = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        if let Err(e) = sink.close().await {
            debug!(connection = id, error = %e, "websocket close failed");
        }
    });

    loop {
        tokio::select! {
            incoming = stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => session.handle_text(text.as_str()).await,
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!(connection = id, error = %e, "websocket receive failed");
                    break;
                }
            },
            _ = &mut writer => {
                debug!(connection = id, "websocket writer finished");
                break;
            }
        }
    }

    drop(session);
    writer.abort();
}
