//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use chittychat_shared::protocol::{BROADCAST_PATH, HEALTH_PATH, JOIN_PATH, LEAVE_PATH, ROOM_PATH};
use tokio::{net::TcpListener, sync::broadcast};
use tower_http::trace::TraceLayer;

use crate::usecase::{
    BroadcastMessageUseCase, GetRoomStateUseCase, JoinRoomUseCase, LeaveRoomUseCase,
};

use super::{
    handler::{broadcast_handler, health_check, leave_handler, room_state, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Chat room server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(join, broadcast, leave, get_room_state);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    app_state: Arc<AppState>,
}

impl Server {
    pub fn new(
        join_room_usecase: Arc<JoinRoomUseCase>,
        broadcast_message_usecase: Arc<BroadcastMessageUseCase>,
        leave_room_usecase: Arc<LeaveRoomUseCase>,
        get_room_state_usecase: Arc<GetRoomStateUseCase>,
    ) -> Self {
        let (shutdown, _) = broadcast::channel(1);
        Self {
            app_state: Arc::new(AppState {
                join_room_usecase,
                broadcast_message_usecase,
                leave_room_usecase,
                get_room_state_usecase,
                shutdown,
            }),
        }
    }

    /// Build the router
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント（Join ストリーム）
            .route(JOIN_PATH, get(websocket_handler))
            // HTTP エンドポイント
            .route(BROADCAST_PATH, post(broadcast_handler))
            .route(LEAVE_PATH, post(leave_handler))
            .route(ROOM_PATH, get(room_state))
            .route(HEALTH_PATH, get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone())
    }

    /// Bind to `host:port` and serve until Ctrl+C / SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat room server listening on {}", listener.local_addr()?);
        tracing::info!("Join stream: ws://{}{}", bind_addr, JOIN_PATH);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener until `signal` resolves.
    ///
    /// When the signal fires, every open Join stream is cancelled so the
    /// graceful shutdown does not wait on long-lived connections.
    pub async fn serve<F>(self, listener: TcpListener, signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let shutdown = self.app_state.shutdown.clone();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                signal.await;
                let streams = shutdown.send(()).unwrap_or(0);
                tracing::info!("Cancelling {} open stream(s)", streams);
            })
            .await
    }
}
