//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use chittychat_shared::protocol::{
    BroadcastAck, BroadcastRequest, LeaveAck, LeaveRequest, RoomStateDto,
};

use crate::{
    domain::{LogicalTimestamp, ParticipantName},
    ui::state::AppState,
};

/// Broadcast RPC
pub async fn broadcast_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BroadcastRequest>,
) -> Result<Json<BroadcastAck>, StatusCode> {
    let name = parse_name(request.name)?;

    let outcome = state
        .broadcast_message_usecase
        .execute(
            name,
            request.message,
            parse_timestamp(request.timestamp)?,
        )
        .await;

    Ok(Json(BroadcastAck {
        timestamp: outcome.timestamp.value(),
        recipients: outcome.report.delivered,
    }))
}

/// Leave RPC
pub async fn leave_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LeaveRequest>,
) -> Result<Json<LeaveAck>, StatusCode> {
    let name = parse_name(request.name)?;
    let timestamp = parse_timestamp(request.timestamp)?;

    let outcome = state
        .leave_room_usecase
        .execute(name.clone(), timestamp)
        .await;

    Ok(Json(LeaveAck {
        name: name.into_string(),
        timestamp: outcome.timestamp.value(),
    }))
}

/// Current clock and participants
pub async fn room_state(State(state): State<Arc<AppState>>) -> Json<RoomStateDto> {
    let room = state.get_room_state_usecase.execute().await;
    Json(room.into())
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Reject timestamps the server clock could not advance past.
pub(super) fn parse_timestamp(raw: i64) -> Result<LogicalTimestamp, StatusCode> {
    let timestamp = LogicalTimestamp::new(raw);
    if !timestamp.is_acceptable() {
        tracing::warn!(
            "Rejecting timestamp {} above the accepted maximum {}",
            timestamp,
            LogicalTimestamp::MAX_ACCEPTED
        );
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(timestamp)
}

fn parse_name(raw: String) -> Result<ParticipantName, StatusCode> {
    ParticipantName::try_from(raw.clone()).map_err(|e| {
        tracing::warn!("Invalid participant name '{}': {}", raw, e);
        StatusCode::BAD_REQUEST
    })
}
