//! UseCase layer: room lifecycle, fan-out and delivery.

pub mod broadcast_message;
pub mod deliver_notifications;
pub mod error;
pub mod get_room_state;
pub mod join_room;
pub mod leave_room;

pub use broadcast_message::{BroadcastMessageUseCase, BroadcastOutcome};
pub use deliver_notifications::{DeliveryEnd, run_delivery_loop};
pub use error::JoinError;
pub use get_room_state::GetRoomStateUseCase;
pub use join_room::{JoinRoomUseCase, JoinedRoom};
pub use leave_room::{LeaveOutcome, LeaveRoomUseCase};
