//! Server state shared by every handler.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::usecase::{
    BroadcastMessageUseCase, GetRoomStateUseCase, JoinRoomUseCase, LeaveRoomUseCase,
};

/// Shared application state
pub struct AppState {
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub broadcast_message_usecase: Arc<BroadcastMessageUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub get_room_state_usecase: Arc<GetRoomStateUseCase>,
    /// Fired once when the process starts shutting down; every open Join
    /// stream subscribes to it.
    pub shutdown: broadcast::Sender<()>,
}
