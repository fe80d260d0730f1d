//! WebSocket を使った NotificationSink 実装
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は分割済みの送信側を受け取り、通知を JSON テキストとして送信します。

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use chittychat_shared::protocol::NotificationDto;
use futures_util::{SinkExt, stream::SplitSink};

use crate::domain::{DeliveryError, Notification, NotificationSink};

pub struct WebSocketNotificationSink {
    sender: SplitSink<WebSocket, Message>,
}

impl WebSocketNotificationSink {
    pub fn new(sender: SplitSink<WebSocket, Message>) -> Self {
        Self { sender }
    }

    /// Send a close frame and flush.
    pub async fn close(&mut self) -> Result<(), DeliveryError> {
        self.sender
            .close()
            .await
            .map_err(|e| DeliveryError::SendFailed(e.to_string()))
    }
}

#[async_trait]
impl NotificationSink for WebSocketNotificationSink {
    async fn send(&mut self, notification: &Notification) -> Result<(), DeliveryError> {
        let json = serde_json::to_string(&NotificationDto::from(notification))
            .map_err(|e| DeliveryError::Encode(e.to_string()))?;
        self.sender
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| DeliveryError::SendFailed(e.to_string()))
    }
}
