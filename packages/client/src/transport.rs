//! Transport to the room server.
//!
//! Join is a WebSocket stream of notifications; Broadcast and Leave are
//! plain JSON requests over HTTP.

use async_trait::async_trait;
use chittychat_shared::{
    clock::LogicalTimestamp,
    protocol::{
        BROADCAST_PATH, BroadcastAck, BroadcastRequest, JOIN_PATH, LEAVE_PATH, LeaveAck,
        LeaveRequest, NotificationDto,
    },
};
use futures_util::{StreamExt, stream::BoxStream};
use reqwest::{StatusCode, Url};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, protocol::Message},
};

use crate::error::ClientError;

/// Notifications pushed by the server, in delivery order.
///
/// The stream ends when the server closes it.
pub type NotificationStream = BoxStream<'static, Result<NotificationDto, ClientError>>;

/// The three room RPCs as seen from a client
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomTransport: Send + Sync {
    /// Open the Join stream for `name`, carrying the sender's clock.
    async fn join(
        &self,
        name: &str,
        timestamp: LogicalTimestamp,
    ) -> Result<NotificationStream, ClientError>;

    async fn broadcast(
        &self,
        name: &str,
        message: &str,
        timestamp: LogicalTimestamp,
    ) -> Result<BroadcastAck, ClientError>;

    async fn leave(
        &self,
        name: &str,
        timestamp: LogicalTimestamp,
    ) -> Result<LeaveAck, ClientError>;
}

/// [`RoomTransport`] over WebSocket and HTTP
pub struct HttpRoomTransport {
    http_base: String,
    ws_base: String,
    http: reqwest::Client,
}

impl HttpRoomTransport {
    pub fn new(server_ip: &str, server_port: u16) -> Self {
        Self {
            http_base: format!("http://{}:{}", server_ip, server_port),
            ws_base: format!("ws://{}:{}", server_ip, server_port),
            http: reqwest::Client::new(),
        }
    }

    fn join_url(&self, name: &str, timestamp: LogicalTimestamp) -> Result<Url, ClientError> {
        Url::parse_with_params(
            &format!("{}{}", self.ws_base, JOIN_PATH),
            &[("name", name.to_string()), ("timestamp", timestamp.to_string())],
        )
        .map_err(|e| ClientError::ConnectionError(e.to_string()))
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: serde::Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}{}", self.http_base, path))
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ClientError::RequestFailed(format!("{}: {}", status, detail)));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| ClientError::Protocol(e.to_string()))
    }
}

#[async_trait]
impl RoomTransport for HttpRoomTransport {
    async fn join(
        &self,
        name: &str,
        timestamp: LogicalTimestamp,
    ) -> Result<NotificationStream, ClientError> {
        let url = self.join_url(name, timestamp)?;
        tracing::debug!("Dialing {}", url);

        let (ws_stream, _response) = connect_async(url.as_str())
            .await
            .map_err(|e| classify_handshake_error(name, e))?;

        let (_write, read) = ws_stream.split();
        let notifications = futures_util::stream::unfold(Some(read), |state| async move {
            let mut read = state?;
            loop {
                match read.next().await {
                    Some(Ok(Message::Text(text))) => {
                        let item = serde_json::from_str::<NotificationDto>(text.as_str())
                            .map_err(|e| ClientError::Protocol(e.to_string()));
                        return Some((item, Some(read)));
                    }
                    Some(Ok(Message::Close(_))) | None => return None,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        return Some((Err(ClientError::ConnectionError(e.to_string())), None));
                    }
                }
            }
        });

        Ok(notifications.boxed())
    }

    async fn broadcast(
        &self,
        name: &str,
        message: &str,
        timestamp: LogicalTimestamp,
    ) -> Result<BroadcastAck, ClientError> {
        let request = BroadcastRequest {
            name: name.to_string(),
            message: message.to_string(),
            timestamp: timestamp.value(),
        };
        self.post_json(BROADCAST_PATH, &request).await
    }

    async fn leave(
        &self,
        name: &str,
        timestamp: LogicalTimestamp,
    ) -> Result<LeaveAck, ClientError> {
        let request = LeaveRequest {
            name: name.to_string(),
            timestamp: timestamp.value(),
        };
        self.post_json(LEAVE_PATH, &request).await
    }
}

/// Map a failed WebSocket handshake to a client error.
///
/// 409 means the name is held by an active participant, any other HTTP
/// status is a rejected request, everything else is a connection problem.
fn classify_handshake_error(name: &str, error: WsError) -> ClientError {
    match error {
        WsError::Http(response) if response.status().as_u16() == StatusCode::CONFLICT.as_u16() => {
            ClientError::DuplicateName(name.to_string())
        }
        WsError::Http(response) => ClientError::RequestFailed(response.status().to_string()),
        other => ClientError::ConnectionError(other.to_string()),
    }
}
