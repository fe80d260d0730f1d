//! Outbound stream seam used by the delivery loop.

use async_trait::async_trait;
use thiserror::Error;

use super::Notification;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("failed to encode notification: {0}")]
    Encode(String),

    #[error("failed to send notification: {0}")]
    SendFailed(String),
}

/// The participant's outbound stream.
#[async_trait]
pub trait NotificationSink: Send {
    async fn send(&mut self, notification: &Notification) -> Result<(), DeliveryError>;
}
