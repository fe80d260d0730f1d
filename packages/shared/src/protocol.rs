//! Wire protocol shared by the server and the client.
//!
//! | RPC       | Transport                                      | Response          |
//! |-----------|------------------------------------------------|-------------------|
//! | Join      | `GET /ws?name=..&timestamp=..` (WebSocket)     | `NotificationDto` stream |
//! | Broadcast | `POST /api/broadcast` with `BroadcastRequest`  | `BroadcastAck`    |
//! | Leave     | `POST /api/leave` with `LeaveRequest`          | `LeaveAck`        |

use serde::{Deserialize, Serialize};

/// Path of the WebSocket endpoint that carries the Join stream.
pub const JOIN_PATH: &str = "/ws";
/// Path of the Broadcast RPC.
pub const BROADCAST_PATH: &str = "/api/broadcast";
/// Path of the Leave RPC.
pub const LEAVE_PATH: &str = "/api/leave";
/// Path of the room state endpoint.
pub const ROOM_PATH: &str = "/api/room";
/// Path of the health check endpoint.
pub const HEALTH_PATH: &str = "/api/health";

/// Maximum message length the client accepts from its user, in characters.
///
/// This is a client-side input rule; the server does not enforce it.
pub const MAX_MESSAGE_LENGTH: usize = 128;

/// Query parameters of the Join stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinQuery {
    pub name: String,
    pub timestamp: i64,
}

/// One room notification pushed down a participant's stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDto {
    pub text: String,
    pub timestamp: i64,
}

/// Broadcast request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastRequest {
    pub name: String,
    pub message: String,
    pub timestamp: i64,
}

/// Broadcast response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastAck {
    /// Server clock right after observing the broadcast
    pub timestamp: i64,
    /// Number of mailboxes the notification was enqueued into
    pub recipients: usize,
}

/// Leave request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    pub name: String,
    pub timestamp: i64,
}

/// Leave response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveAck {
    pub name: String,
    /// Server clock right after observing the leave
    pub timestamp: i64,
}

/// One participant as shown by the room state endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub name: String,
    /// Wall-clock join time in RFC 3339, display only
    pub joined_at: String,
}

/// Room state snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStateDto {
    pub clock: i64,
    pub participants: Vec<ParticipantDto>,
}
