//! Conversion logic between DTOs and domain entities.

use chittychat_shared::{
    protocol::{NotificationDto, ParticipantDto, RoomStateDto},
    time::millis_to_rfc3339,
};

use crate::domain::{Notification, ParticipantSummary, RoomState};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Notification> for NotificationDto {
    fn from(model: &Notification) -> Self {
        Self {
            text: model.text().to_string(),
            timestamp: model.timestamp().value(),
        }
    }
}

impl From<ParticipantSummary> for ParticipantDto {
    fn from(model: ParticipantSummary) -> Self {
        Self {
            name: model.name.into_string(),
            joined_at: millis_to_rfc3339(model.joined_at),
        }
    }
}

impl From<RoomState> for RoomStateDto {
    fn from(model: RoomState) -> Self {
        Self {
            clock: model.clock.value(),
            participants: model.participants.into_iter().map(Into::into).collect(),
        }
    }
}
