//! Join stream over WebSocket.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use chittychat_shared::protocol::JoinQuery;
use futures_util::stream::{SplitStream, StreamExt};

use crate::{
    domain::{MailboxReceiver, ParticipantName},
    infrastructure::notification_sink::WebSocketNotificationSink,
    ui::state::AppState,
    usecase::{DeliveryEnd, JoinError, run_delivery_loop},
};

use super::http::parse_timestamp;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<JoinQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let name = match ParticipantName::try_from(query.name.clone()) {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("Invalid participant name '{}': {}", query.name, e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };
    let timestamp = parse_timestamp(query.timestamp)?;

    match state
        .join_room_usecase
        .execute(name.clone(), timestamp)
        .await
    {
        Ok(joined) => Ok(ws.on_upgrade(move |socket| {
            handle_socket(socket, state, name, joined.mailbox)
        })),
        Err(JoinError::DuplicateName(_)) => Err(StatusCode::CONFLICT),
    }
}

/// Run the participant's delivery loop until the stream is cancelled or the
/// mailbox is closed by a Leave.
async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    name: ParticipantName,
    mut mailbox: MailboxReceiver,
) {
    let (sender, receiver) = socket.split();
    let mut sink = WebSocketNotificationSink::new(sender);
    let mut shutdown = state.shutdown.subscribe();

    let client_name = name.clone();
    let cancelled = async move {
        tokio::select! {
            _ = wait_for_client_close(receiver, &client_name) => {}
            _ = shutdown.recv() => {
                tracing::debug!("Server shutting down, closing stream of '{}'", client_name);
            }
        }
    };

    match run_delivery_loop(&name, &mut mailbox, &mut sink, cancelled).await {
        DeliveryEnd::MailboxClosed => {
            tracing::info!("Stream of '{}' finished after leave", name);
        }
        DeliveryEnd::Cancelled => {
            // The registry entry stays until an explicit Leave; a later Join
            // under the same name replaces it.
            tracing::info!("Stream of '{}' ended without leave", name);
        }
        DeliveryEnd::SendFailed(e) => {
            tracing::warn!("Stream of '{}' failed: {}", name, e);
            return;
        }
    }

    if let Err(e) = sink.close().await {
        tracing::debug!("Failed to close stream of '{}': {}", name, e);
    }
}

/// Resolves once the client closes its side of the stream.
///
/// The Join stream is server-push only; inbound frames other than Close are
/// ignored.
async fn wait_for_client_close(mut receiver: SplitStream<WebSocket>, name: &ParticipantName) {
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Close(_)) => {
                tracing::info!("Client '{}' requested close", name);
                return;
            }
            Ok(Message::Ping(_)) => {
                tracing::debug!("Received ping from '{}'", name);
            }
            Ok(_) => {
                tracing::debug!("Ignoring inbound frame from '{}'", name);
            }
            Err(e) => {
                tracing::warn!("WebSocket error from '{}': {}", name, e);
                return;
            }
        }
    }
    tracing::info!("Client '{}' disconnected", name);
}
