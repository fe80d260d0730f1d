//! Infrastructure layer: concrete implementations of the domain seams.

pub mod dto;
pub mod message_pusher;
pub mod notification_sink;
pub mod registry;
